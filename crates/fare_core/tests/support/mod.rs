#![allow(dead_code)]

pub mod estimates;
