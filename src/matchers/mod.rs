pub mod title_matcher;
