pub mod user_cleanup;
