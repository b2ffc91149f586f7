#![allow(dead_code)]

pub mod storage_server;
