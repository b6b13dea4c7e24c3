// tests/pacer/main.rs

mod throttle_tests;
