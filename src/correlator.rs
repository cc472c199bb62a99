//! Response correlator.
//!
//! Wraps a command in the envelope of the client role, sends it as one
//! request-response exchange and checks the status of the reply. Transport
//! errors for the exchange are returned as they are; a reply with a failed
//! status becomes [`ElarianError::Application`] carrying its description.

use crate::client::Client;
use crate::codec::ProtoCodec;
use crate::error::{ElarianError, Result};
use crate::handler::Role;
use crate::proto::{
    app_to_server_command, app_to_server_command_reply, simulator_to_server_command,
    AppToServerCommand, AppToServerCommandReply, SimulatorToServerCommand,
    SimulatorToServerCommandReply,
};

/// Enum statuses at or above this value are failures.
const FAILURE_STATUS: i32 = 400;

impl Client {
    /// Send an app command and return the checked reply variant.
    pub async fn send_app(
        &self,
        command: app_to_server_command::Entry,
    ) -> Result<app_to_server_command_reply::Entry> {
        let request = ProtoCodec::encode(&AppToServerCommand {
            entry: Some(command),
        });
        let reply: AppToServerCommandReply = ProtoCodec::decode(&self.send_command(request).await?)?;
        check_app_reply(reply)
    }

    /// Send a simulator command. Only simulator clients may do this.
    pub async fn send_simulator(
        &self,
        command: simulator_to_server_command::Entry,
    ) -> Result<SimulatorToServerCommandReply> {
        if self.role() != Role::Simulator {
            return Err(ElarianError::Configuration(
                "Simulator commands need a simulator client".to_string(),
            ));
        }
        let request = ProtoCodec::encode(&SimulatorToServerCommand {
            entry: Some(command),
        });
        let reply: SimulatorToServerCommandReply =
            ProtoCodec::decode(&self.send_command(request).await?)?;
        check_simulator_reply(reply)
    }
}

fn ensure(ok: bool, description: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(ElarianError::Application(description.to_string()))
    }
}

pub(crate) fn check_app_reply(
    reply: AppToServerCommandReply,
) -> Result<app_to_server_command_reply::Entry> {
    use app_to_server_command_reply::Entry;

    let entry = reply
        .entry
        .ok_or_else(|| ElarianError::Protocol("Empty command reply".to_string()))?;

    match &entry {
        Entry::GetCustomerState(r) => ensure(r.status, &r.description)?,
        Entry::UpdateCustomerState(r) => ensure(r.status, &r.description)?,
        Entry::UpdateCustomerAppData(r) => ensure(r.status, &r.description)?,
        Entry::SendMessage(r) => ensure(r.status < FAILURE_STATUS, &r.description)?,
        Entry::UpdateMessagingConsent(r) => ensure(r.status < FAILURE_STATUS, &r.description)?,
    }
    Ok(entry)
}

pub(crate) fn check_simulator_reply(
    reply: SimulatorToServerCommandReply,
) -> Result<SimulatorToServerCommandReply> {
    ensure(reply.status, &reply.description)?;
    Ok(reply)
}

/// Name of a reply variant, for errors about unexpected replies.
pub(crate) fn reply_name(entry: &app_to_server_command_reply::Entry) -> &'static str {
    use app_to_server_command_reply::Entry;

    match entry {
        Entry::GetCustomerState(_) => "get_customer_state",
        Entry::UpdateCustomerState(_) => "update_customer_state",
        Entry::UpdateCustomerAppData(_) => "update_customer_app_data",
        Entry::SendMessage(_) => "send_message",
        Entry::UpdateMessagingConsent(_) => "update_messaging_consent",
    }
}

pub(crate) fn unexpected_reply(
    expected: &str,
    entry: &app_to_server_command_reply::Entry,
) -> ElarianError {
    ElarianError::Protocol(format!(
        "Expected a {} reply, got {}",
        expected,
        reply_name(entry)
    ))
}
