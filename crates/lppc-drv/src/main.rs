use std::process::exit;

fn main() {
    match lppc_drv::run() {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            exit(1);
        }
    }
}
