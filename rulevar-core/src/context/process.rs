//! Process metadata access.

use sysinfo::{Pid, Process, ProcessesToUpdate, System, Users};

use crate::errors::ValueError;
use crate::traits::CancellationToken;

/// Handle onto a live process, queried lazily by the process valuers.
///
/// Each method returns `Ok(None)` when the platform does not report the fact
/// for this process, and an error when the lookup itself failed (typically
/// because the process exited mid-scan). The name and command-line lookups
/// take the scan's cancellation token and must consult it before performing
/// introspection.
pub trait ProcessInfo: Send + Sync {
    /// Parent process id.
    fn parent_id(&self) -> Result<Option<i64>, ValueError>;

    /// Name of the account the process runs as.
    fn user_name(&self) -> Result<Option<String>, ValueError>;

    /// Account SID on Windows; the numeric uid as a string on Unixes.
    fn user_sid(&self) -> Result<Option<String>, ValueError>;

    /// Session the process belongs to.
    fn session_id(&self) -> Result<Option<i64>, ValueError>;

    /// Process name.
    fn name(&self, token: &CancellationToken) -> Result<Option<String>, ValueError>;

    /// Full command line, arguments joined by single spaces.
    fn command_line(&self, token: &CancellationToken) -> Result<Option<String>, ValueError>;
}

/// Production [`ProcessInfo`] backed by `sysinfo`.
///
/// [`attach`](SystemProcess::attach) takes one snapshot of the target
/// process; the accessors read from that snapshot. A process that exits
/// between attach and a later refresh surfaces as
/// [`ValueError::ProcessGone`].
#[derive(Debug)]
pub struct SystemProcess {
    system: System,
    pid: Pid,
}

impl SystemProcess {
    /// Snapshot the process with the given pid.
    pub fn attach(pid: u32) -> Result<Self, ValueError> {
        let mut system = System::new();
        let target = Pid::from_u32(pid);
        let _ = system.refresh_processes(ProcessesToUpdate::Some(&[target]), true);
        if system.process(target).is_none() {
            return Err(ValueError::ProcessGone { pid });
        }
        Ok(Self {
            system,
            pid: target,
        })
    }

    fn process(&self) -> Result<&Process, ValueError> {
        self.system.process(self.pid).ok_or(ValueError::ProcessGone {
            pid: self.pid.as_u32(),
        })
    }

    fn check_cancelled(token: &CancellationToken) -> Result<(), ValueError> {
        if token.is_cancelled() {
            return Err(ValueError::Cancelled);
        }
        Ok(())
    }
}

impl ProcessInfo for SystemProcess {
    fn parent_id(&self) -> Result<Option<i64>, ValueError> {
        Ok(self.process()?.parent().map(|p| i64::from(p.as_u32())))
    }

    fn user_name(&self) -> Result<Option<String>, ValueError> {
        let process = self.process()?;
        let Some(uid) = process.user_id() else {
            return Ok(None);
        };
        let users = Users::new_with_refreshed_list();
        Ok(users.get_user_by_id(uid).map(|u| u.name().to_string()))
    }

    fn user_sid(&self) -> Result<Option<String>, ValueError> {
        Ok(self.process()?.user_id().map(|uid| uid.to_string()))
    }

    fn session_id(&self) -> Result<Option<i64>, ValueError> {
        Ok(self.process()?.session_id().map(|p| i64::from(p.as_u32())))
    }

    fn name(&self, token: &CancellationToken) -> Result<Option<String>, ValueError> {
        Self::check_cancelled(token)?;
        Ok(Some(self.process()?.name().to_string_lossy().into_owned()))
    }

    fn command_line(&self, token: &CancellationToken) -> Result<Option<String>, ValueError> {
        Self::check_cancelled(token)?;
        let process = self.process()?;
        let cmd = process.cmd();
        if cmd.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            cmd.iter()
                .map(|arg| arg.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" "),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_current_process() {
        let proc = SystemProcess::attach(std::process::id()).unwrap();
        let token = CancellationToken::new();
        assert!(proc.parent_id().unwrap().is_some());
        let name = proc.name(&token).unwrap().unwrap();
        assert!(!name.is_empty());
        let cmdline = proc.command_line(&token).unwrap().unwrap();
        assert!(!cmdline.is_empty());
        // Session id and user facts may be unavailable in minimal
        // environments; the lookups must still succeed.
        let _ = proc.session_id().unwrap();
        let _ = proc.user_sid().unwrap();
    }

    #[test]
    fn test_attach_missing_process() {
        let err = SystemProcess::attach(999_999_999).unwrap_err();
        assert!(matches!(err, ValueError::ProcessGone { .. }));
    }

    #[test]
    fn test_cancellation_short_circuits() {
        let proc = SystemProcess::attach(std::process::id()).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        assert!(matches!(proc.name(&token), Err(ValueError::Cancelled)));
        assert!(matches!(
            proc.command_line(&token),
            Err(ValueError::Cancelled)
        ));
    }
}
