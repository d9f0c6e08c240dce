//! POSIX-style front for the unit table
//!
//! Callers address units by name and sessions by file descriptor. Every call
//! returns a non-negative result on success or a negated errno on failure,
//! the way a character device answers its file operations.
//!
//! # Thread Safety
//!
//! The fd table has its own lock, held only while looking a session up. Each
//! session sits behind its own mutex so that operations on different fds run
//! in parallel and only contend on the unit lock.

use core::ffi::c_int;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cancel::CancelToken;
use crate::engine::Whence;
use crate::error::UnitError;
use crate::error_mapping::EBADF;
use crate::session::Session;
use crate::table::UnitTable;

type SessionRef = Arc<Mutex<Session>>;

struct OpenFile {
    session: SessionRef,
    cancel: CancelToken,
}

/// fd → session mapping
#[derive(Default)]
pub struct FdTable {
    table: HashMap<c_int, OpenFile>,
    next_fd: c_int,
}

impl FdTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new fd for `session`
    pub fn insert(&mut self, session: Session) -> c_int {
        let fd = self.next_fd;
        self.next_fd += 1;
        let cancel = session.cancel_token();
        self.table.insert(
            fd,
            OpenFile {
                session: Arc::new(Mutex::new(session)),
                cancel,
            },
        );
        fd
    }

    fn get(&self, fd: c_int) -> Option<SessionRef> {
        self.table.get(&fd).map(|file| Arc::clone(&file.session))
    }

    fn cancel_token(&self, fd: c_int) -> Option<CancelToken> {
        self.table.get(&fd).map(|file| file.cancel.clone())
    }

    /// Remove an fd mapping, returning whether it existed
    pub fn remove(&mut self, fd: c_int) -> bool {
        self.table.remove(&fd).is_some()
    }

    /// Get all open file descriptors
    pub fn keys(&self) -> impl Iterator<Item = &c_int> {
        self.table.keys()
    }
}

pub struct Transport {
    table: UnitTable,
    fds: Mutex<FdTable>,
}

impl Transport {
    #[must_use]
    pub fn new(table: UnitTable) -> Self {
        Self {
            table,
            fds: Mutex::new(FdTable::new()),
        }
    }

    #[must_use]
    pub fn table(&self) -> &UnitTable {
        &self.table
    }

    /// Currently open fds, ascending
    #[must_use]
    pub fn open_fds(&self) -> Vec<c_int> {
        let mut fds: Vec<c_int> = self.fds.lock().keys().copied().collect();
        fds.sort_unstable();
        fds
    }

    /// Open a session on the unit called `name`
    pub fn open(&self, name: &str) -> c_int {
        match self.table.open_by_name(name) {
            Ok(session) => {
                let fd = self.fds.lock().insert(session);
                debug!(unit = name, fd, "open");
                fd
            }
            Err(e) => {
                warn!(unit = name, error = %e, "open failed");
                -e.errno()
            }
        }
    }

    /// Drop the session behind `fd`
    pub fn release(&self, fd: c_int) -> c_int {
        if self.fds.lock().remove(fd) {
            debug!(fd, "release");
            0
        } else {
            warn!(fd, "release: fd not found");
            -EBADF
        }
    }

    pub fn read(&self, fd: c_int, buf: &mut [u8]) -> isize {
        self.with_session(fd, |session| session.read(buf))
            .map_or_else(|errno| -(errno as isize), |n| n as isize)
    }

    /// Write at the session cursor; a write that does not fit returns 0
    pub fn write(&self, fd: c_int, buf: &[u8]) -> isize {
        self.with_session(fd, |session| session.write(buf))
            .map_or_else(|errno| -(errno as isize), |n| n as isize)
    }

    /// Reposition the session cursor; `whence` is 0, 1 or 2
    pub fn lseek(&self, fd: c_int, offset: i64, whence: c_int) -> i64 {
        self.with_session(fd, |session| {
            let whence = Whence::try_from(whence)?;
            session.seek(offset, whence)
        })
        .map_or_else(|errno| -i64::from(errno), |pos| pos as i64)
    }

    pub fn ioctl(&self, fd: c_int, cmd: u32) -> c_int {
        self.with_session(fd, |session| session.control(cmd))
            .map_or_else(|errno| -errno, |()| 0)
    }

    /// Interrupt a pending or future lock wait on `fd`
    ///
    /// Does not touch the session mutex, so it works while another thread is
    /// blocked inside an operation on the same fd.
    pub fn interrupt(&self, fd: c_int) -> c_int {
        match self.fds.lock().cancel_token(fd) {
            Some(cancel) => {
                cancel.cancel();
                0
            }
            None => -EBADF,
        }
    }

    fn with_session<T>(
        &self,
        fd: c_int,
        op: impl FnOnce(&mut Session) -> Result<T, UnitError>,
    ) -> Result<T, c_int> {
        let Some(session) = self.fds.lock().get(fd) else {
            warn!(fd, "fd not found");
            return Err(EBADF);
        };
        let mut session = session.lock();
        op(&mut session).map_err(|e| {
            debug!(fd, error = %e, "operation failed");
            e.errno()
        })
    }
}
