/// Screen modules for the browser
pub mod browse;
