
mod fanout_tests;
mod navigate_tests;
mod scroll_tests;
