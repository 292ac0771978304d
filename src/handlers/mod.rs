pub mod cashcards;
