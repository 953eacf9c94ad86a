//! Compositor lifecycle: display, socket, client connections, and the
//! event queue drained by the host platform.

use std::collections::HashMap;
use std::os::unix::io::{AsRawFd, RawFd};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use wayland_server::backend::{ClientData, ClientId, DisconnectReason};
use wayland_server::{Display, DisplayHandle, ListeningSocket};

use crate::core::errors::CoreError;
use crate::core::input::DeviceId;
use crate::core::state::CompositorState;
use crate::core::wayland::protocol::{
    wl_compositor::WlCompositor, wl_drm::WlDrm, wl_input_device::WlInputDevice,
    wl_output::WlOutput, wl_shell::WlShell, wl_shm::WlShm,
};
use crate::util::logging;

/// Per-client data stored with each connection.
#[derive(Debug, Clone)]
pub struct MadronaClientData {
    pub id: u32,
    pub backend_id: ClientId,
    pub connected_at: Instant,
}

impl MadronaClientData {
    pub fn new(id: u32, backend_id: ClientId) -> Self {
        Self { id, backend_id, connected_at: Instant::now() }
    }
}

impl ClientData for MadronaClientData {
    fn initialized(&self, client_id: ClientId) {
        tracing::info!("client {} initialized ({:?})", self.id, client_id);
    }

    fn disconnected(&self, client_id: ClientId, reason: DisconnectReason) {
        let reason_str = match reason {
            DisconnectReason::ConnectionClosed => "connection closed",
            DisconnectReason::ProtocolError(_) => "protocol error",
        };
        tracing::info!("client {} disconnected: {} ({:?})", self.id, reason_str, client_id);
    }
}

#[derive(Debug, Clone)]
pub struct CompositorConfig {
    /// Socket name under XDG_RUNTIME_DIR (e.g. "wayland-0").
    pub socket_name: String,
    pub output_width: u32,
    pub output_height: u32,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            socket_name: "wayland-0".to_string(),
            output_width: 800,
            output_height: 600,
        }
    }
}

/// Events emitted by the compositor for the host platform to handle.
#[derive(Debug, Clone)]
pub enum CompositorEvent {
    ClientConnected { client_id: ClientId },
    ClientDisconnected { client_id: ClientId },
    SurfaceMapped { surface_id: u32 },
    SurfaceDestroyed { surface_id: u32 },
    RedrawNeeded,
    OutputCloseRequested { output_id: u32 },
}

/// The main compositor object: owns the display and listening socket,
/// accepts clients, and dispatches protocol traffic into the state.
pub struct Compositor {
    display: Display<CompositorState>,
    socket: ListeningSocket,
    config: CompositorConfig,
    next_client_id: u32,
    clients: HashMap<u32, MadronaClientData>,
    running: bool,
}

impl Compositor {
    pub fn new(config: CompositorConfig) -> Result<Self> {
        tracing::info!("creating compositor on socket {}", config.socket_name);

        let display = Display::new().context("failed to create display")?;
        let socket = ListeningSocket::bind(&config.socket_name)
            .with_context(|| format!("failed to bind socket {}", config.socket_name))?;

        Ok(Self {
            display,
            socket,
            config,
            next_client_id: 1,
            clients: HashMap::new(),
            running: false,
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(CompositorConfig::default())
    }

    pub fn display_handle(&self) -> DisplayHandle {
        self.display.handle()
    }

    pub fn socket_name(&self) -> &str {
        &self.config.socket_name
    }

    pub fn socket_fd(&self) -> RawFd {
        self.socket.as_raw_fd()
    }

    pub fn display_fd(&mut self) -> RawFd {
        self.display.backend().poll_fd().as_raw_fd()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Register protocol globals and open for business.
    pub fn start(&mut self, state: &mut CompositorState) -> Result<()> {
        if self.running {
            return Err(CoreError::state_error("compositor already running").into());
        }
        self.register_globals(state);
        self.running = true;
        crate::mlog!(logging::COMPOSITOR, "listening on {}", self.config.socket_name);
        Ok(())
    }

    /// Globals mirror the state's object tables: one input device global
    /// per device, one output global per output, and the drm global only
    /// when a device is actually available to authenticate against.
    fn register_globals(&mut self, state: &mut CompositorState) {
        let dh = self.display.handle();

        dh.create_global::<CompositorState, WlCompositor, _>(1, ());
        dh.create_global::<CompositorState, WlShm, _>(1, ());
        dh.create_global::<CompositorState, WlShell, _>(1, ());
        if state.drm.is_some() {
            dh.create_global::<CompositorState, WlDrm, _>(1, ());
        }
        let outputs: Vec<u32> = state.outputs.iter().map(|o| o.id).collect();
        for id in outputs {
            dh.create_global::<CompositorState, WlOutput, _>(1, id);
        }
        let devices: Vec<DeviceId> = state.devices.keys().copied().collect();
        for id in devices {
            dh.create_global::<CompositorState, WlInputDevice, _>(1, id);
        }
    }

    /// Accept any pending client connections on the listening socket.
    pub fn accept_connections(&mut self, state: &mut CompositorState) {
        loop {
            let stream = match self.socket.accept() {
                Ok(Some(stream)) => stream,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("accept failed: {}", e);
                    break;
                }
            };
            let id = self.next_client_id;
            self.next_client_id += 1;

            // The backend id is only known after insertion.
            struct PlaceholderClientData;
            impl ClientData for PlaceholderClientData {
                fn initialized(&self, _client_id: ClientId) {}
                fn disconnected(&self, _client_id: ClientId, _reason: DisconnectReason) {}
            }

            match self.display.handle().insert_client(stream, Arc::new(PlaceholderClientData)) {
                Ok(client) => {
                    let backend_id = client.id();
                    crate::mlog!(logging::COMPOSITOR, "accepted client {}", id);
                    self.clients
                        .insert(id, MadronaClientData::new(id, backend_id.clone()));
                    state.push_event(CompositorEvent::ClientConnected { client_id: backend_id });
                }
                Err(e) => {
                    tracing::error!("failed to insert client: {}", e);
                }
            }
        }
    }

    /// Accept connections, dispatch pending requests, and flush replies.
    pub fn dispatch(&mut self, state: &mut CompositorState) -> Result<usize> {
        if !self.running {
            return Ok(0);
        }
        self.accept_connections(state);
        let dispatched = self
            .display
            .dispatch_clients(state)
            .context("failed to dispatch clients")?;
        self.display.flush_clients().context("failed to flush clients")?;
        Ok(dispatched)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.display.flush_clients().context("failed to flush clients")?;
        Ok(())
    }

    pub fn take_client_ids(&self) -> Vec<ClientId> {
        self.clients.values().map(|c| c.backend_id.clone()).collect()
    }

    /// Shut down: the display goes first so clients see a clean
    /// disconnect before any state is torn down behind them.
    pub fn stop(&mut self, state: &mut CompositorState) -> Result<()> {
        if !self.running {
            return Err(CoreError::state_error("compositor not running").into());
        }
        tracing::info!("stopping compositor, {} clients connected", self.clients.len());

        if let Err(e) = self.display.flush_clients() {
            tracing::warn!("flush during shutdown failed: {}", e);
        }
        self.clients.clear();
        self.running = false;

        // Surfaces and buffers are released after the display has
        // stopped referencing them.
        let surfaces: Vec<u32> = state.surfaces.keys().copied().collect();
        let time = state.clock.now_ms();
        for id in surfaces {
            state.destroy_surface(id, time);
        }
        let buffers: Vec<u32> = state.buffers.keys().copied().collect();
        for id in buffers {
            state.buffer_unref(id);
        }

        crate::mlog!(logging::COMPOSITOR, "compositor stopped");
        Ok(())
    }
}
