pub mod confirm_dialog;
