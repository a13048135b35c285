//! Request/server signal flags shared by the commands that classify a run.

use clap::Args;
use shared::models::ServerSignals;

#[derive(Args, Debug, Clone, Default)]
pub struct SignalArgs {
    /// Start from the CGI-style process variables (SERVER_NAME, HTTP_HOST, ...)
    #[arg(long)]
    pub from_env: bool,

    /// Server name, as in SERVER_NAME
    #[arg(long)]
    pub server_name: Option<String>,

    /// Address the server is bound to
    #[arg(long)]
    pub server_addr: Option<String>,

    /// Address of the connecting client
    #[arg(long)]
    pub remote_addr: Option<String>,

    /// Server software banner
    #[arg(long)]
    pub server_software: Option<String>,

    /// HTTPS indicator; any value other than "off" means TLS
    #[arg(long)]
    pub https: Option<String>,

    /// X-Forwarded-Proto header
    #[arg(long)]
    pub forwarded_proto: Option<String>,

    /// X-Forwarded-Host header
    #[arg(long)]
    pub forwarded_host: Option<String>,

    /// Host header
    #[arg(long)]
    pub http_host: Option<String>,

    /// Server port
    #[arg(long)]
    pub server_port: Option<String>,

    /// Path of the executing script
    #[arg(long)]
    pub script_name: Option<String>,
}

impl SignalArgs {
    /// Builds the signal bundle; explicit flags override process variables.
    pub fn into_signals(self) -> ServerSignals {
        let base = if self.from_env {
            ServerSignals::from_cgi_env()
        } else {
            ServerSignals::default()
        };

        ServerSignals {
            server_name: self.server_name.or(base.server_name),
            server_addr: self.server_addr.or(base.server_addr),
            remote_addr: self.remote_addr.or(base.remote_addr),
            server_software: self.server_software.or(base.server_software),
            https: self.https.or(base.https),
            forwarded_proto: self.forwarded_proto.or(base.forwarded_proto),
            forwarded_host: self.forwarded_host.or(base.forwarded_host),
            http_host: self.http_host.or(base.http_host),
            server_port: self.server_port.or(base.server_port),
            script_name: self.script_name.or(base.script_name),
        }
    }
}
