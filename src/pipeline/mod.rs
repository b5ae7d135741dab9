pub mod resolution; // Request → chart specification cascade
