//! VisibilityDetector: определяет, какие каналы стали видимыми или перестали быть
//! видимыми в двух слотах отображения.
//!
//! Каждый слот сравнивается только со своим предыдущим значением. Перекрёстная
//! проверка с НОВЫМ значением другого слота подавляет повторные уведомления,
//! когда канал виден сразу в двух местах.

use crate::error::Result;
use crate::events::{ChangeKind, ChannelId, Slot, ViewSnapshot, VisibilityChange};
use crate::trace_if_enabled;
use smallvec::SmallVec;

use super::state_reader::StateProvider;

/// Не больше одного добавления и одного удаления на слот
pub type Changes = SmallVec<[VisibilityChange; 4]>;

#[derive(Debug, Default)]
pub struct VisibilityDetector {
    previous: ViewSnapshot,
}

impl VisibilityDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Детектор с заданной исходной базой сравнения
    pub fn with_baseline(previous: ViewSnapshot) -> Self {
        Self { previous }
    }

    pub fn previous(&self) -> &ViewSnapshot {
        &self.previous
    }

    pub fn reset(&mut self) {
        self.previous = ViewSnapshot::default();
    }

    /// Берёт свежий снимок у провайдера и вызывает колбэки для каждого изменения.
    ///
    /// Сначала вызываются колбэки основного слота, затем дополнительного.
    pub fn detect<P, A, R>(&mut self, state_provider: P, mut on_added: A, mut on_removed: R)
    where
        P: FnOnce() -> ViewSnapshot,
        A: FnMut(&ChannelId),
        R: FnMut(&ChannelId),
    {
        for change in self.evaluate(state_provider()) {
            match change.kind {
                ChangeKind::Added => on_added(&change.channel_id),
                ChangeKind::Removed => on_removed(&change.channel_id),
            }
        }
    }

    /// Вариант `detect` для провайдера, который может не прочитать состояние.
    /// При ошибке база сравнения не меняется.
    pub fn detect_from(&mut self, provider: &dyn StateProvider) -> Result<Changes> {
        let snapshot = provider.snapshot()?;
        Ok(self.evaluate(snapshot))
    }

    /// Вычисляет изменения относительно предыдущего снимка и запоминает новый.
    pub fn evaluate(&mut self, current: ViewSnapshot) -> Changes {
        let mut changes = Changes::new();

        for slot in Slot::ALL {
            let new_id = current.channel(slot);
            let old_id = self.previous.channel(slot);

            if new_id == old_id {
                continue;
            }

            let other_id = current.channel(slot.other());
            trace_if_enabled!(
                "Слот {}: {} -> {} (другой слот: {})",
                slot,
                old_id,
                new_id,
                other_id
            );

            let new_elsewhere = new_id == other_id;
            let old_elsewhere = old_id == other_id;

            if !new_elsewhere && !old_elsewhere {
                if !new_id.is_empty() {
                    changes.push(VisibilityChange::added(new_id.clone(), slot));
                }
                if !old_id.is_empty() {
                    changes.push(VisibilityChange::removed(old_id.clone(), slot));
                }
            } else if !new_elsewhere && old_elsewhere {
                // Старый канал остаётся видимым через другой слот
                if !new_id.is_empty() {
                    changes.push(VisibilityChange::added(new_id.clone(), slot));
                }
            } else if new_elsewhere && !old_elsewhere {
                // Новый канал уже был виден через другой слот
                if !old_id.is_empty() {
                    changes.push(VisibilityChange::removed(old_id.clone(), slot));
                }
            }
        }

        self.previous = current;
        changes
    }
}
