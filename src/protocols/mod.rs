pub mod qkd;
