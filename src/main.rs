use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;

use madrona::core::render::host::HeadlessGraphics;
use madrona::core::state::StubDrmDevice;
use madrona::util::geometry::Rect;
use madrona::util::logging;
use madrona::{mlog, Compositor, CompositorConfig, CompositorEvent, CompositorState};

static QUIT: AtomicBool = AtomicBool::new(false);

extern "C" fn handle_quit(_sig: libc::c_int) {
    QUIT.store(true, Ordering::SeqCst);
}

fn install_quit_handlers() {
    // SAFETY: handler only touches an atomic flag.
    unsafe {
        libc::signal(libc::SIGINT, handle_quit as libc::sighandler_t);
        libc::signal(libc::SIGTERM, handle_quit as libc::sighandler_t);
    }
}

fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info,madrona=debug");
    }
    tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(
            "%Y-%m-%d %H:%M:%S".to_string(),
        ))
        .with_ansi(false)
        .init();

    let config = CompositorConfig::default();
    let mut state = CompositorState::new(Box::new(HeadlessGraphics::new()));
    if let Ok(path) = std::env::var("MADRONA_DRM_DEVICE") {
        state = state.with_drm(Box::new(StubDrmDevice::new(path, true)));
    }

    state.add_output(Rect::new(0, 0, config.output_width, config.output_height));
    state.add_device();

    let mut compositor = Compositor::new(config)?;
    compositor.start(&mut state)?;
    mlog!(logging::MAIN, "madrona running on {}", compositor.socket_name());

    install_quit_handlers();

    let display_fd = compositor.display_fd();
    let socket_fd = compositor.socket_fd();

    while !QUIT.load(Ordering::SeqCst) {
        let mut fds = [
            libc::pollfd { fd: display_fd, events: libc::POLLIN, revents: 0 },
            libc::pollfd { fd: socket_fd, events: libc::POLLIN, revents: 0 },
        ];
        // SAFETY: fds points at a valid array for the duration of the call.
        let ret = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, 100) };
        if ret < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == std::io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err.into());
        }

        compositor.dispatch(&mut state)?;

        for event in state.take_events() {
            match event {
                CompositorEvent::OutputCloseRequested { output_id } => {
                    mlog!(logging::MAIN, "output {} closed, quitting", output_id);
                    QUIT.store(true, Ordering::SeqCst);
                }
                CompositorEvent::SurfaceMapped { surface_id } => {
                    tracing::debug!("surface {} mapped", surface_id);
                }
                CompositorEvent::SurfaceDestroyed { surface_id } => {
                    tracing::debug!("surface {} destroyed", surface_id);
                }
                CompositorEvent::ClientConnected { .. }
                | CompositorEvent::ClientDisconnected { .. }
                | CompositorEvent::RedrawNeeded => {}
            }
        }
    }

    compositor.stop(&mut state)?;
    Ok(())
}
