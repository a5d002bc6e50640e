#![forbid(unsafe_code)]

//! Field editor: placement, move/resize, and settings over one document.
//!
//! [`FieldEditor`] owns the field collection, the placement session, the
//! form id allocator, the field bounds tracker, and the recipient selection.
//! The host feeds it [`Event`]s plus a [`PageSurfaceLocator`] and drains
//! [`EditorEvent`]s afterwards.
//!
//! # Invariants
//!
//! 1. Every committed placement appends exactly one field and queues exactly
//!    one [`EditorEvent::FieldCommitted`].
//! 2. Every listener command from the session is queued as
//!    [`EditorEvent::ListenersChanged`], in order.
//! 3. A cancelled placement queues only the `Unsubscribe`; nothing else.
//! 4. Move and resize re-read the page surface at the moment they run.
//!
//! # Failure Modes
//!
//! - Page surface not mounted, or without usable area, during move/resize:
//!   the update is skipped (logged at `debug`), not an error.
//! - Field node without finite, positive geometry: skipped the same way.
//! - Move/resize/remove of a field the selected recipient does not own:
//!   skipped (logged at `debug`).

use std::collections::VecDeque;

use ahash::AHashSet;
use docfield_core::bounds::{FieldBoundsTracker, FieldSizing};
use docfield_core::event::{CancelReason, Event};
use docfield_core::field::{FieldType, FormId, FormIdAllocator, GeometryPatch};
use docfield_core::geometry::{PageRect, PixelRect, PixelSize, rect_to_page_percent};
use docfield_core::recipient::Recipient;
use docfield_core::surface::PageSurfaceLocator;
use docfield_meta::{DraftStore, FieldMetaEditor, SavedMeta};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::collection::{FieldCollection, GeometryChange};
use crate::error::{CollectionError, Result};
use crate::field::{PlacedField, StoredField};
use crate::session::{
    ListenerCommand, PlacementContext, PlacementEffect, PlacementSession, PlacementTransition,
};

/// Editor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Sizing policy for new fields.
    pub sizing: FieldSizing,
    /// Fixed seed for form id allocation. Random per editor when unset.
    pub id_seed: Option<u64>,
}

/// Notification for the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum EditorEvent {
    /// A placement committed a new field.
    FieldCommitted { field: PlacedField },
    /// An existing field was moved or resized.
    GeometryChanged { index: usize, patch: GeometryPatch },
    /// The host must (un)subscribe its global pointer listeners.
    ListenersChanged(ListenerCommand),
    /// A field was removed.
    FieldRemoved { index: usize, form_id: FormId },
}

#[derive(Debug, Clone)]
pub struct FieldEditor {
    config: EditorConfig,
    fields: FieldCollection,
    session: PlacementSession,
    ids: FormIdAllocator,
    bounds: FieldBoundsTracker,
    recipients: Vec<Recipient>,
    selected: Option<usize>,
    outbox: VecDeque<EditorEvent>,
}

impl Default for FieldEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl FieldEditor {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let ids = config
            .id_seed
            .map_or_else(FormIdAllocator::default, FormIdAllocator::with_seed);
        Self {
            config,
            fields: FieldCollection::new(),
            session: PlacementSession::new(),
            ids,
            bounds: FieldBoundsTracker::new(config.sizing),
            recipients: Vec::new(),
            selected: None,
            outbox: VecDeque::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub const fn fields(&self) -> &FieldCollection {
        &self.fields
    }

    #[must_use]
    pub const fn session(&self) -> &PlacementSession {
        &self.session
    }

    /// Current field bounds in device pixels.
    #[must_use]
    pub const fn field_bounds(&self) -> PixelSize {
        self.bounds.bounds()
    }

    // -- Recipients ---------------------------------------------------------

    /// Replace the recipient list and select the default one: the first not
    /// yet sent, else the first.
    pub fn set_recipients(&mut self, recipients: Vec<Recipient>) {
        self.selected = Recipient::default_selection(&recipients)
            .and_then(|chosen| recipients.iter().position(|r| r.id == chosen.id));
        self.recipients = recipients;
    }

    #[must_use]
    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    /// Select a recipient by id. Returns `false` if the id is unknown.
    pub fn select_recipient(&mut self, recipient_id: i64) -> bool {
        match self.recipients.iter().position(|r| r.id == recipient_id) {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn selected_recipient(&self) -> Option<&Recipient> {
        self.selected.and_then(|index| self.recipients.get(index))
    }

    /// Whether new fields can be placed for the selected recipient.
    #[must_use]
    pub fn placement_enabled(&self) -> bool {
        self.selected_recipient()
            .is_some_and(Recipient::can_receive_fields)
    }

    /// Whether the selected recipient may move, resize, or remove a field.
    #[must_use]
    pub fn can_edit(&self, index: usize) -> bool {
        self.fields
            .get(index)
            .is_some_and(|field| field.editable_by(self.selected_recipient()))
    }

    // -- Placement ----------------------------------------------------------

    /// Arm a placement from the palette.
    pub fn arm(&mut self, field_type: FieldType) -> PlacementTransition {
        let transition = self.session.arm(field_type);
        self.absorb(&transition);
        transition
    }

    /// Abandon an armed placement. `None` when nothing was armed.
    pub fn cancel_placement(&mut self, reason: CancelReason) -> Option<PlacementTransition> {
        let transition = self.session.cancel(reason)?;
        self.absorb(&transition);
        Some(transition)
    }

    /// Feed one host event.
    ///
    /// Returns the session transition for pointer and cancel events.
    pub fn handle_event<L>(&mut self, event: &Event, locator: &L) -> Option<PlacementTransition>
    where
        L: PageSurfaceLocator + ?Sized,
    {
        match event {
            Event::Pointer(pointer) => {
                let recipient = self.selected.and_then(|index| self.recipients.get(index));
                let mut context = PlacementContext {
                    locator,
                    recipient,
                    bounds: self.bounds.bounds(),
                    ids: &mut self.ids,
                };
                let transition = self.session.apply_pointer(pointer, &mut context);
                self.absorb(&transition);
                Some(transition)
            }
            Event::SurfaceResized { page_number, size } => {
                if self.bounds.surface_changed(*size) {
                    debug!(
                        message = "editor.bounds_changed",
                        page_number,
                        width = self.bounds.bounds().width,
                        height = self.bounds.bounds().height
                    );
                }
                None
            }
            Event::Cancel { reason } => self.cancel_placement(*reason),
        }
    }

    fn absorb(&mut self, transition: &PlacementTransition) {
        if let PlacementEffect::Committed { field } = &transition.effect {
            self.commit(field.clone());
        }
        if let Some(command) = transition.listener {
            self.outbox.push_back(EditorEvent::ListenersChanged(command));
        }
    }

    fn commit(&mut self, mut field: PlacedField) {
        while self.fields.is_issued(&field.form_id) {
            field.form_id = self.ids.allocate();
        }
        match self.fields.append(field.clone()) {
            Ok(_) => self.outbox.push_back(EditorEvent::FieldCommitted { field }),
            Err(error) => warn!(message = "editor.commit_rejected", error = %error),
        }
    }

    // -- Move / resize ------------------------------------------------------

    /// A rendered field node was dragged to `node` (device pixels).
    ///
    /// Patches the origin only; the size is kept.
    pub fn field_moved<L>(
        &mut self,
        index: usize,
        node: PixelRect,
        locator: &L,
    ) -> Result<Option<GeometryChange>>
    where
        L: PageSurfaceLocator + ?Sized,
    {
        let Some(resolved) = self.resolve_node(index, &node, locator)? else {
            return Ok(None);
        };
        let current = self.field_rect(index)?;
        let rect = PageRect::new(resolved.x, resolved.y, current.width, current.height).clamped();
        self.apply_geometry(index, GeometryPatch::moved(rect))
    }

    /// A rendered field node was resized to `node` (device pixels).
    ///
    /// Patches origin and size. Nodes without area are ignored.
    pub fn field_resized<L>(
        &mut self,
        index: usize,
        node: PixelRect,
        locator: &L,
    ) -> Result<Option<GeometryChange>>
    where
        L: PageSurfaceLocator + ?Sized,
    {
        let Some(resolved) = self.resolve_node(index, &node, locator)? else {
            return Ok(None);
        };
        self.apply_geometry(index, GeometryPatch::resized(resolved.clamped()))
    }

    fn field_rect(&self, index: usize) -> Result<PageRect> {
        self.fields
            .get(index)
            .map(PlacedField::rect)
            .ok_or_else(|| self.out_of_range(index).into())
    }

    fn resolve_node<L>(
        &self,
        index: usize,
        node: &PixelRect,
        locator: &L,
    ) -> Result<Option<PageRect>>
    where
        L: PageSurfaceLocator + ?Sized,
    {
        let field = self.fields.get(index).ok_or_else(|| self.out_of_range(index))?;
        if node.is_degenerate() {
            debug!(
                message = "editor.node_degenerate",
                index,
                left = node.left,
                top = node.top,
                width = node.width,
                height = node.height
            );
            return Ok(None);
        }
        if !field.editable_by(self.selected_recipient()) {
            debug!(message = "editor.field_locked", index, form_id = %field.form_id);
            return Ok(None);
        }
        let Some(surface) = locator.surface(field.page_number) else {
            debug!(
                message = "editor.surface_missing",
                index,
                page_number = field.page_number
            );
            return Ok(None);
        };
        match rect_to_page_percent(node, &surface.rect()) {
            Ok(rect) => Ok(Some(rect)),
            Err(error) => {
                debug!(message = "editor.surface_unanchorable", index, error = %error);
                Ok(None)
            }
        }
    }

    fn apply_geometry(&mut self, index: usize, patch: GeometryPatch) -> Result<Option<GeometryChange>> {
        let change = self.fields.update_geometry(index, patch)?;
        self.outbox.push_back(EditorEvent::GeometryChanged {
            index: change.index,
            patch: change.patch,
        });
        Ok(Some(change))
    }

    fn out_of_range(&self, index: usize) -> CollectionError {
        CollectionError::IndexOutOfRange {
            index,
            len: self.fields.len(),
        }
    }

    // -- Collection ---------------------------------------------------------

    /// Remove the field at `index` if the selected recipient owns it.
    pub fn remove_field(&mut self, index: usize) -> Result<Option<PlacedField>> {
        if self.fields.get(index).is_none() {
            return Err(self.out_of_range(index).into());
        }
        if !self.can_edit(index) {
            debug!(message = "editor.field_locked", index);
            return Ok(None);
        }
        let field = self.fields.remove(index)?;
        self.outbox.push_back(EditorEvent::FieldRemoved {
            index,
            form_id: field.form_id.clone(),
        });
        Ok(Some(field))
    }

    /// Remove every field.
    pub fn remove_all_fields(&mut self) -> Vec<PlacedField> {
        let removed = self.fields.remove_all();
        for (index, field) in removed.iter().enumerate().rev() {
            self.outbox.push_back(EditorEvent::FieldRemoved {
                index,
                form_id: field.form_id.clone(),
            });
        }
        removed
    }

    /// Load persisted fields, resolving signer emails from the recipients.
    ///
    /// All or nothing: a record on page 0, or a form id already issued or
    /// repeated within the batch, rejects the whole batch and leaves the
    /// collection untouched. Returns how many fields were appended.
    pub fn load_stored(&mut self, stored: &[StoredField]) -> Result<usize> {
        let mut batch = Vec::with_capacity(stored.len());
        let mut seen = AHashSet::with_capacity(stored.len());
        for record in stored {
            let field = record.to_placed(&self.recipients)?;
            if self.fields.is_issued(&field.form_id) || !seen.insert(field.form_id.clone()) {
                warn!(
                    message = "editor.load.duplicate_form_id",
                    form_id = %field.form_id,
                    batch = stored.len()
                );
                return Err(CollectionError::DuplicateFormId {
                    form_id: field.form_id,
                }
                .into());
            }
            batch.push(field);
        }

        let count = batch.len();
        for field in batch {
            self.fields.append(field)?;
        }
        debug!(message = "editor.loaded", count);
        Ok(count)
    }

    /// Snapshot of every field, in order, for persistence.
    #[must_use]
    pub fn snapshot(&self) -> Vec<PlacedField> {
        self.fields.as_slice().to_vec()
    }

    // -- Settings -----------------------------------------------------------

    /// Open the settings of a field: default state, then draft, then the
    /// metadata currently on the field.
    pub fn open_settings<D>(&self, form_id: &FormId, drafts: &D) -> Result<FieldMetaEditor>
    where
        D: DraftStore + ?Sized,
    {
        let field = self
            .fields
            .find(form_id)
            .ok_or_else(|| CollectionError::UnknownFormId {
                form_id: form_id.clone(),
            })?;
        let persisted = field
            .field_meta
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(docfield_meta::MetaError::from)?;
        Ok(FieldMetaEditor::open(
            form_id.clone(),
            field.field_type,
            drafts,
            persisted.as_ref(),
        )?)
    }

    /// Save settings to the draft store and attach them to the field.
    ///
    /// Violations do not block the save; they come back in the result.
    pub fn save_settings<D>(&mut self, settings: &FieldMetaEditor, drafts: &mut D) -> Result<SavedMeta>
    where
        D: DraftStore + ?Sized,
    {
        let saved = settings.save(drafts)?;
        self.fields.update_meta(settings.form_id(), saved.meta.clone())?;
        Ok(saved)
    }

    // -- Events -------------------------------------------------------------

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        self.outbox.drain(..).collect()
    }

    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.outbox.len()
    }
}
