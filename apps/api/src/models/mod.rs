pub mod candidate;
