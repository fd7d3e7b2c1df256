mod engine_test;
mod history_test;
mod scan_test;
