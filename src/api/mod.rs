pub mod vacation;
