pub mod channel_worker;
