//! Process-wide error reporting setup

/// Initialize error handling for the application
pub fn install_error_handlers() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Route panics through tracing so they land in structured logs
    std::panic::set_hook(Box::new(|panic_info| {
        if let Some(location) = panic_info.location() {
            tracing::error!(
                message = %panic_info,
                panic.file = location.file(),
                panic.line = location.line(),
                panic.column = location.column(),
                "Application panic"
            );
        } else {
            tracing::error!(message = %panic_info, "Application panic");
        }

        // Test harnesses report panics themselves
        if std::env::var_os("RUST_TEST").is_some() {
            return;
        }

        eprintln!("The application panicked! This is a bug and should be reported.");

        if let Some(location) = panic_info.location() {
            eprintln!(
                "Panic occurred at {}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            );
        }

        if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            eprintln!("Panic message: {}", s);
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            eprintln!("Panic message: {}", s);
        }

        eprintln!("Stack trace:");
        eprintln!("{}", std::backtrace::Backtrace::force_capture());
    }));

    Ok(())
}
