//! UI module - reusable widgets shared by the list and detail views

pub mod components;
