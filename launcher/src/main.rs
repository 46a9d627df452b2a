use nadm::{exit_codes, logging};

fn main() {
    logging::init();
    match nadm::launch(std::env::args_os().skip(1)) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            std::process::exit(exit_codes::FAILURE);
        }
    }
}
