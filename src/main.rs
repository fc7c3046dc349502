#![windows_subsystem = "windows"]

use clap::Parser;
use eframe::egui;
use pixelpad::app::PixelpadApp;
use pixelpad::cli::CliArgs;
use pixelpad::settings::AppSettings;
use pixelpad::{i18n, log_info, logger};

fn main() -> Result<(), eframe::Error> {
    #[cfg(target_os = "windows")]
    attach_parent_console();

    let args = CliArgs::parse();

    // Initialize session log (overwrites previous session log)
    match &args.log_file {
        Some(path) => logger::init_at(path),
        None => logger::init(),
    }

    // Initialize the internationalization system
    i18n::init();

    let mut settings = AppSettings::load();
    args.apply_to(&mut settings);

    let language = if settings.language.is_empty() {
        i18n::detect_system_language()
    } else {
        settings.language.clone()
    };
    i18n::set_language(&language);
    log_info!(
        "Startup: language={} zoom={} color={}",
        i18n::current_language(),
        settings.zoom.get(),
        settings.default_color
    );

    let tool = args.tool;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 860.0])
            .with_min_inner_size([480.0, 360.0])
            .with_title(pixelpad::t!("app.title")),
        ..Default::default()
    };

    eframe::run_native(
        "Pixelpad",
        options,
        Box::new(move |cc| Box::new(PixelpadApp::new(cc, settings, tool))),
    )
}


/// The binary is a GUI-subsystem program, so Windows gives it no console. When
/// launched from a terminal, borrow that terminal so clap's help, version and
/// argument errors reach it. Launched from Explorer, there is no parent console
/// and this does nothing.
#[cfg(target_os = "windows")]
fn attach_parent_console() {
    unsafe extern "system" {
        fn AttachConsole(process_id: u32) -> i32;
        fn SetStdHandle(std_handle: u32, handle: isize) -> i32;
        fn CreateFileW(
            file_name: *const u16,
            desired_access: u32,
            share_mode: u32,
            security_attributes: *const std::ffi::c_void,
            creation_disposition: u32,
            flags_and_attributes: u32,
            template_file: isize,
        ) -> isize;
    }
    const ATTACH_PARENT_PROCESS: u32 = 0xFFFF_FFFF;
    const GENERIC_WRITE: u32 = 0x4000_0000;
    const FILE_SHARE_READ_WRITE: u32 = 0x0000_0003;
    const OPEN_EXISTING: u32 = 3;
    const STD_OUTPUT_HANDLE: u32 = 0xFFFF_FFF5; // -11
    const STD_ERROR_HANDLE: u32 = 0xFFFF_FFF4; // -12
    const INVALID_HANDLE_VALUE: isize = -1;

    // SAFETY: plain Win32 calls with a NUL-terminated wide string that outlives them.
    unsafe {
        if AttachConsole(ATTACH_PARENT_PROCESS) == 0 {
            return;
        }
        let conout: Vec<u16> = "CONOUT$\0".encode_utf16().collect();
        let handle = CreateFileW(
            conout.as_ptr(),
            GENERIC_WRITE,
            FILE_SHARE_READ_WRITE,
            std::ptr::null(),
            OPEN_EXISTING,
            0,
            0,
        );
        if handle != INVALID_HANDLE_VALUE {
            SetStdHandle(STD_OUTPUT_HANDLE, handle);
            SetStdHandle(STD_ERROR_HANDLE, handle);
        }
    }
}
