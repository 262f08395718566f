use super::session::VoiceSession;
use super::snapshot::SessionSnapshot;
use crate::voice::GuildId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, Weak};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// Per-guild cell; `retired` is set once the slot has been unlinked from the map
#[derive(Default)]
struct Slot {
    session: Option<VoiceSession>,
    retired: bool,
}

/// Map entry: the locked cell plus the last state committed through it
#[derive(Default)]
struct Entry {
    slot: Arc<Mutex<Slot>>,
    published: Option<SessionSnapshot>,
}

type SlotMap = HashMap<GuildId, Entry>;

/// Process-wide guild → session map
///
/// The outer map is only locked for lookups and insert/remove of slots. Each
/// guild has its own async mutex, so operations on one guild are serialized
/// while unrelated guilds proceed concurrently. Reads never wait on a guild:
/// they see the snapshot published when that guild's lock was last released.
#[derive(Default)]
pub struct SessionRegistry {
    slots: Arc<StdMutex<SlotMap>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the exclusive lock for one guild
    ///
    /// Everything that mutates a session goes through the returned guard.
    pub async fn lock(&self, guild_id: GuildId) -> SessionGuard {
        loop {
            let slot = {
                let mut slots = lock_map(&self.slots);
                Arc::clone(&slots.entry(guild_id).or_default().slot)
            };

            let guard = slot.lock_owned().await;
            if guard.retired {
                // Unlinked while we waited; the map may already hold a fresh slot
                continue;
            }

            return SessionGuard {
                guild_id,
                guard,
                slots: Arc::downgrade(&self.slots),
            };
        }
    }

    /// Look up a guild's session without creating anything
    ///
    /// Returns the last committed state, even while another operation holds
    /// the guild's lock across a transport call.
    pub fn get(&self, guild_id: GuildId) -> Option<SessionSnapshot> {
        lock_map(&self.slots)
            .get(&guild_id)
            .and_then(|entry| entry.published.clone())
    }

    /// Evict a guild's session, handing it back to the caller
    ///
    /// Idempotent: removing an absent guild returns `None`. Releasing any
    /// handle or sink the session still owns is the caller's job.
    pub async fn remove(&self, guild_id: GuildId) -> Option<VoiceSession> {
        let present = lock_map(&self.slots).contains_key(&guild_id);
        if !present {
            return None;
        }
        self.lock(guild_id).await.take()
    }

    /// Guilds that currently have a session
    pub fn guild_ids(&self) -> Vec<GuildId> {
        self.snapshots().into_iter().map(|s| s.guild_id).collect()
    }

    /// Snapshots of every registered session, ordered by guild id
    pub fn snapshots(&self) -> Vec<SessionSnapshot> {
        let mut snapshots: Vec<SessionSnapshot> = lock_map(&self.slots)
            .values()
            .filter_map(|entry| entry.published.clone())
            .collect();
        snapshots.sort_by_key(|s| s.guild_id);
        snapshots
    }

    pub fn len(&self) -> usize {
        lock_map(&self.slots)
            .values()
            .filter(|entry| entry.published.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exclusive access to one guild's session slot
///
/// On drop, a vacant session (no handle, no sink) is evicted and an empty slot
/// is unlinked from the registry, so no zero-value entries linger.
pub struct SessionGuard {
    guild_id: GuildId,
    guard: OwnedMutexGuard<Slot>,
    slots: Weak<StdMutex<SlotMap>>,
}

impl SessionGuard {
    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    pub fn session(&self) -> Option<&VoiceSession> {
        self.guard.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut VoiceSession> {
        self.guard.session.as_mut()
    }

    /// Existing session, or a newly stored empty one
    pub fn get_or_create(&mut self) -> &mut VoiceSession {
        let guild_id = self.guild_id;
        self.guard.session.get_or_insert_with(|| {
            debug!(guild_id = %guild_id, "Creating voice session");
            VoiceSession::new(guild_id)
        })
    }

    /// Remove the session from the registry
    pub fn take(&mut self) -> Option<VoiceSession> {
        self.guard.session.take()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.guard.session.as_ref().is_some_and(VoiceSession::is_vacant) {
            debug!(guild_id = %self.guild_id, "Evicting vacant voice session");
            self.guard.session = None;
        }

        let Some(slots) = self.slots.upgrade() else {
            return;
        };

        // Still holding the slot lock here, so publishing and unlinking happen
        // before the next holder of this guild can run.
        let mut slots = lock_map(&slots);
        let ours = slots
            .get(&self.guild_id)
            .is_some_and(|entry| Arc::ptr_eq(&entry.slot, OwnedMutexGuard::mutex(&self.guard)));

        match self.guard.session.as_ref().map(VoiceSession::snapshot) {
            Some(snapshot) => {
                if let Some(entry) = slots.get_mut(&self.guild_id).filter(|_| ours) {
                    entry.published = Some(snapshot);
                }
            }
            None => {
                self.guard.retired = true;
                if ours {
                    slots.remove(&self.guild_id);
                }
            }
        }
    }
}

fn lock_map(slots: &StdMutex<SlotMap>) -> std::sync::MutexGuard<'_, SlotMap> {
    // Map operations cannot panic midway, so a poisoned lock still holds a valid map
    slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
