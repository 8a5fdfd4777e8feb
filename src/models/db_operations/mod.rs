pub mod posts_db_operations;
