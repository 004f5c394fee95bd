pub mod channel_check;
