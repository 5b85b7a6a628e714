//! # SSH front end
//!
//! Accepts connections, authenticates with a password against the store,
//! and turns each accepted shell into a [`SessionWorker`]. Per-connection
//! failures are logged and never stop the accept loop.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use russh::server::{self, Auth, Msg as ChannelMsg, Server, Session};
use russh::{Channel, ChannelId, Pty};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::bbs::hostkey;
use crate::bbs::input::InputParser;
use crate::bbs::session::SessionWorker;
use crate::config::Config;
use crate::logutil::escape_log;
use crate::storage::Store;
use crate::tui::message::{Key, Msg};

pub struct BbsServer {
    bbs_name: String,
    welcome: String,
    store: Arc<Store>,
}

impl BbsServer {
    /// Load or create the host key, bind the configured address and serve
    /// until the process is stopped.
    pub async fn run(config: Config, store: Arc<Store>) -> Result<()> {
        let key = hostkey::load_or_create(Path::new(&config.ssh.host_key_path))?;
        let ssh_config = Arc::new(server::Config {
            keys: vec![key],
            auth_rejection_time: Duration::from_secs(1),
            inactivity_timeout: None,
            ..Default::default()
        });
        let addr = format!("{}:{}", config.ssh.listen, config.ssh.port);
        info!("Listening for SSH connections on {}", addr);
        let mut server = BbsServer {
            bbs_name: config.bbs.name.clone(),
            welcome: config.bbs.welcome.clone(),
            store,
        };
        server
            .run_on_address(ssh_config, addr.as_str())
            .await
            .with_context(|| format!("Failed to serve on {}", addr))?;
        Ok(())
    }
}

impl server::Server for BbsServer {
    type Handler = ClientHandler;

    fn new_client(&mut self, peer: Option<SocketAddr>) -> ClientHandler {
        debug!("Connection from {:?}", peer);
        ClientHandler {
            store: self.store.clone(),
            bbs_name: self.bbs_name.clone(),
            welcome: self.welcome.clone(),
            username: None,
            pty_sizes: HashMap::new(),
            channels: HashMap::new(),
        }
    }

    fn handle_session_error(&mut self, error: <Self::Handler as server::Handler>::Error) {
        warn!("Connection error: {}", error);
    }
}

struct ChannelState {
    tx: UnboundedSender<Msg>,
    parser: InputParser,
}

pub struct ClientHandler {
    store: Arc<Store>,
    bbs_name: String,
    welcome: String,
    username: Option<String>,
    /// Sizes from pty requests, keyed per channel so concurrent shells on
    /// one connection do not clobber each other.
    pty_sizes: HashMap<ChannelId, (u16, u16)>,
    channels: HashMap<ChannelId, ChannelState>,
}

impl ClientHandler {
    fn reject() -> Auth {
        Auth::Reject {
            proceed_with_methods: None,
            partial_success: false,
        }
    }
}

impl server::Handler for ClientHandler {
    type Error = anyhow::Error;

    async fn auth_password(&mut self, user: &str, password: &str) -> Result<Auth, Self::Error> {
        // Unknown user and wrong password are indistinguishable here.
        match self.store.verify_credential(user, password).await {
            Ok(true) => {
                info!("Authenticated {}", escape_log(user));
                self.username = Some(user.to_string());
                Ok(Auth::Accept)
            }
            Ok(false) => {
                info!("Rejected authentication for {}", escape_log(user));
                Ok(Self::reject())
            }
            Err(e) => {
                warn!("Credential check failed for {}: {}", escape_log(user), e);
                Ok(Self::reject())
            }
        }
    }

    async fn channel_open_session(
        &mut self,
        channel: Channel<ChannelMsg>,
        _session: &mut Session,
    ) -> Result<bool, Self::Error> {
        debug!("Session channel {:?} opened", channel.id());
        Ok(true)
    }

    async fn pty_request(
        &mut self,
        channel: ChannelId,
        _term: &str,
        col_width: u32,
        row_height: u32,
        _pix_width: u32,
        _pix_height: u32,
        _modes: &[(Pty, u32)],
        session: &mut Session,
    ) -> Result<(), Self::Error> {
        self.pty_sizes
            .insert(channel, (col_width as u16, row_height as u16));
        session.channel_success(channel)?;
        Ok(())
    }

    async fn shell_request(
        &mut self,
        channel: ChannelId,
        session: &mut Session,
    ) -> Result<(), Self::Error> {
        let Some(username) = self.username.clone() else {
            session.channel_failure(channel)?;
            return Ok(());
        };
        // Re-fetch the stored role: a grant made since the last login on
        // this connection is honored, but the result is then fixed for the
        // whole session.
        let role = match self.store.get_user(&username).await {
            Ok(Some(user)) => user.role,
            Ok(None) => {
                warn!("User {} vanished before shell start", escape_log(&username));
                session.channel_failure(channel)?;
                return Ok(());
            }
            Err(e) => {
                warn!("Role lookup failed for {}: {}", escape_log(&username), e);
                session.channel_failure(channel)?;
                return Ok(());
            }
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let worker = SessionWorker::new(
            session.handle(),
            channel,
            rx,
            tx.clone(),
            self.store.clone(),
            username,
            role,
            self.bbs_name.clone(),
            self.welcome.clone(),
        );
        let (cols, rows) = self.pty_sizes.remove(&channel).unwrap_or((80, 24));
        let _ = tx.send(Msg::Resize { cols, rows });
        self.channels.insert(
            channel,
            ChannelState {
                tx,
                parser: InputParser::new(),
            },
        );
        tokio::spawn(worker.run());
        session.channel_success(channel)?;
        Ok(())
    }

    async fn data(
        &mut self,
        channel: ChannelId,
        data: &[u8],
        _session: &mut Session,
    ) -> Result<(), Self::Error> {
        let Some(state) = self.channels.get_mut(&channel) else {
            return Ok(());
        };
        for key in state.parser.feed_packet(data) {
            if key == Key::CtrlC {
                debug!("Interrupt on channel {:?}", channel);
            }
            let _ = state.tx.send(Msg::Key(key));
        }
        Ok(())
    }

    async fn window_change_request(
        &mut self,
        channel: ChannelId,
        col_width: u32,
        row_height: u32,
        _pix_width: u32,
        _pix_height: u32,
        _session: &mut Session,
    ) -> Result<(), Self::Error> {
        if let Some(state) = self.channels.get(&channel) {
            let _ = state.tx.send(Msg::Resize {
                cols: col_width as u16,
                rows: row_height as u16,
            });
        } else {
            self.pty_sizes
                .insert(channel, (col_width as u16, row_height as u16));
        }
        Ok(())
    }

    async fn channel_eof(
        &mut self,
        channel: ChannelId,
        _session: &mut Session,
    ) -> Result<(), Self::Error> {
        self.pty_sizes.remove(&channel);
        if let Some(state) = self.channels.remove(&channel) {
            let _ = state.tx.send(Msg::Closed);
        }
        Ok(())
    }

    async fn channel_close(
        &mut self,
        channel: ChannelId,
        _session: &mut Session,
    ) -> Result<(), Self::Error> {
        self.pty_sizes.remove(&channel);
        if let Some(state) = self.channels.remove(&channel) {
            let _ = state.tx.send(Msg::Closed);
        }
        Ok(())
    }
}
