//! deosil main entrypoint.

use deosil::run;
use deosil::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
