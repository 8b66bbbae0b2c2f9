pub mod add_option_dialog;
pub mod help_popup;
pub mod history_popup;
pub mod popup;
pub mod result_panel;
pub mod selection_panel;
pub mod status_bar;
pub mod wheel_panel;
