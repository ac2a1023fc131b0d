use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{BackupBackend, NoteStore, StorageBackend};

pub fn run<S: StorageBackend, K: BackupBackend>(
    store: &mut NoteStore<S, K>,
) -> Result<CmdResult> {
    let report = store.restore()?;
    let mut result = CmdResult::default().with_restored(report);

    if report.total() == 0 {
        result.add_message(CmdMessage::warning("Backup contained no notes."));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Restored {} entity and {} device note(s)",
            report.entity, report.device
        )));
    }
    Ok(result)
}
