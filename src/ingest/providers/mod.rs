pub mod cryptonews;
