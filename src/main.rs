#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    eco_care_lib::run()
}
