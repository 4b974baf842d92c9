pub mod attachment_manager;
