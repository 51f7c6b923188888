//! Channel-backed announcement plumbing.
//!
//! Arrival announcements are fire-and-forget; hosts whose speech output runs
//! on another thread can hand the scheduler a [`QueuedAnnouncer`] and drain
//! the paired [`AnnouncementQueue`] wherever the actual output lives.

use crate::host::Announcer;
use crossbeam_channel::{Receiver, Sender, unbounded};

#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub text: String,
    pub interrupt: bool,
}

/// Sending half; implements [`Announcer`] for the scheduler.
pub struct QueuedAnnouncer {
    sender: Sender<Announcement>,
}

/// Receiving half; drained by the host's speech output.
pub struct AnnouncementQueue {
    receiver: Receiver<Announcement>,
}

/// Creates a connected announcer/queue pair.
pub fn announcement_channel() -> (QueuedAnnouncer, AnnouncementQueue) {
    let (sender, receiver) = unbounded();
    (QueuedAnnouncer { sender }, AnnouncementQueue { receiver })
}

impl Announcer for QueuedAnnouncer {
    fn announce(&mut self, text: &str, interrupt: bool) {
        // A dropped queue just means nobody is listening anymore.
        let _ = self.sender.send(Announcement {
            text: text.to_owned(),
            interrupt,
        });
    }
}

impl AnnouncementQueue {
    /// The next pending announcement, if any. Never blocks.
    pub fn try_next(&self) -> Option<Announcement> {
        self.receiver.try_recv().ok()
    }

    /// Drains everything currently queued.
    pub fn drain(&self) -> Vec<Announcement> {
        self.receiver.try_iter().collect()
    }
}
