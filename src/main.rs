//! Where the reset happens for the `usbreset` binary!
use usbreset::app;
use usbreset::host::libusb::LibUsbSession;

fn main() {
    let invocation = match app::parse_command(std::env::args_os()) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("{:#}", e);
            app::print_usage();
            std::process::exit(app::EXIT_FAILURE);
        }
    };

    usbreset::set_log_level(invocation.settings.verbosity).unwrap_or_else(|e| {
        eprintln!("Failed to set log level: {}", e);
    });

    let verbosity = invocation.settings.verbosity;
    std::process::exit(app::dispatch(&invocation, || LibUsbSession::new(verbosity)));
}
