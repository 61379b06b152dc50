//! dmdhub main entrypoint.

use dmdhub::run;
use dmdhub::ui::messages::error;

fn main() {
    println!();
    if let Err(e) = run() {
        error(e);
        std::process::exit(1);
    }
}
