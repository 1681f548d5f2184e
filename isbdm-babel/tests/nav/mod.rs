//! Sidebar reconstruction tests

mod hierarchy;
mod sections;
