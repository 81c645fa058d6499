#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_runtime;
mod app_types;
mod cli_args;
mod ipc_commands;
mod logging;
mod navigation_policy;
mod path_rules;
mod presence_bridge;
mod prompt_window;
mod settings;
mod shortcuts;
mod swapper;
mod unload_guard;
mod update_flow;
mod url_rules;
mod userscripts;
mod window_factory;
mod window_state;

pub(crate) use app_constants::*;
pub(crate) use app_types::ShellContext;

fn main() {
    app_runtime::run();
}
