pub mod incident_service;
