#![forbid(unsafe_code)]

//! Pointer tracking session for placing one new field.
//!
//! ```text
//! Idle -> Armed(type) -> Idle
//!            \  ^
//!             \-/  arm again (type replaced), pointer moves
//! ```
//!
//! The palette arms the session with a field type; pointer moves update a
//! preview marker; the release either commits one field or cancels.
//!
//! # Invariants
//!
//! 1. At most one placement is armed at a time. Arming while armed replaces
//!    the pending type and does not subscribe listeners a second time.
//! 2. Leaving `Armed` always emits [`ListenerCommand::Unsubscribe`], whether
//!    by commit or by cancel.
//! 3. A commit carries exactly one field with a fresh form id and a clamped
//!    rectangle; a cancel creates nothing.
//! 4. Every step yields a [`PlacementTransition`] with a strictly increasing
//!    `transition_id`. Inputs that do not apply yield a `Noop` with a reason.
//!
//! # Failure Modes
//!
//! | Condition at release | Outcome |
//! |----------------------|---------|
//! | No recipient, or one that cannot receive fields | cancel `NoRecipient` |
//! | Pointer over no page surface | cancel `NoSurface` |
//! | Field box would hang over the page edge | cancel `OutOfBounds` |
//! | Page surface has no usable area | cancel `NoSurface` |

use docfield_core::event::{CancelReason, PointerEvent, PointerEventKind};
use docfield_core::field::{FieldType, FormIdAllocator};
use docfield_core::geometry::{PixelPoint, PixelSize, place_centered};
use docfield_core::recipient::Recipient;
use docfield_core::surface::PageSurfaceLocator;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::field::PlacedField;

/// Instruction to the host about its global pointer listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerCommand {
    /// Start delivering pointer move / release events.
    Subscribe,
    /// Stop delivering them.
    Unsubscribe,
}

/// Live marker shown under the pointer while a placement is armed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementPreview {
    /// Pointer position in device pixels.
    pub pointer: PixelPoint,
    /// Marker top-left: the pointer minus half the field bounds.
    pub origin: PixelPoint,
    /// Marker size in device pixels.
    pub size: PixelSize,
    /// Page under the pointer, if any.
    pub page_number: Option<u32>,
    /// Whether a release here would commit.
    pub in_bounds: bool,
}

/// Placement lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PlacementState {
    Idle,
    Armed {
        field_type: FieldType,
        preview: Option<PlacementPreview>,
    },
}

/// Why an input was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementNoopReason {
    /// Pointer input or cancel while nothing is armed.
    IdleWithoutPlacement,
}

/// What one step did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum PlacementEffect {
    Armed {
        field_type: FieldType,
        /// Pending type this arm replaced.
        replaced: Option<FieldType>,
    },
    PreviewUpdated {
        preview: PlacementPreview,
    },
    Committed {
        field: PlacedField,
    },
    Canceled {
        field_type: FieldType,
        reason: CancelReason,
    },
    Noop {
        reason: PlacementNoopReason,
    },
}

/// One session step with diagnostic fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementTransition {
    pub transition_id: u64,
    pub from: PlacementState,
    pub to: PlacementState,
    pub effect: PlacementEffect,
    /// Listener change the host must carry out, if any.
    pub listener: Option<ListenerCommand>,
}

impl PlacementTransition {
    /// The committed field, if this step committed one.
    #[must_use]
    pub fn committed(&self) -> Option<&PlacedField> {
        match &self.effect {
            PlacementEffect::Committed { field } => Some(field),
            _ => None,
        }
    }
}

/// Everything a release needs besides the pointer position.
pub struct PlacementContext<'a, L: ?Sized> {
    pub locator: &'a L,
    pub recipient: Option<&'a Recipient>,
    /// Current field bounds in device pixels.
    pub bounds: PixelSize,
    pub ids: &'a mut FormIdAllocator,
}

/// The placement state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementSession {
    state: PlacementState,
    transition_counter: u64,
}

impl Default for PlacementSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementSession {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: PlacementState::Idle,
            transition_counter: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> PlacementState {
        self.state
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        matches!(self.state, PlacementState::Armed { .. })
    }

    /// Field type waiting to be placed.
    #[must_use]
    pub const fn armed_type(&self) -> Option<FieldType> {
        match self.state {
            PlacementState::Idle => None,
            PlacementState::Armed { field_type, .. } => Some(field_type),
        }
    }

    /// Start (or retarget) a placement.
    pub fn arm(&mut self, field_type: FieldType) -> PlacementTransition {
        let from = self.state;
        let (replaced, listener) = match from {
            PlacementState::Idle => (None, Some(ListenerCommand::Subscribe)),
            PlacementState::Armed {
                field_type: previous,
                ..
            } => (Some(previous), None),
        };
        self.state = PlacementState::Armed {
            field_type,
            preview: None,
        };
        debug!(
            message = "placement.arm",
            field_type = %field_type,
            replaced = ?replaced
        );
        self.step(
            from,
            PlacementEffect::Armed {
                field_type,
                replaced,
            },
            listener,
        )
    }

    /// Update the preview for a pointer move.
    pub fn pointer_moved<L>(
        &mut self,
        position: PixelPoint,
        locator: &L,
        bounds: PixelSize,
    ) -> PlacementTransition
    where
        L: PageSurfaceLocator + ?Sized,
    {
        let from = self.state;
        let PlacementState::Armed { field_type, .. } = from else {
            return self.noop(from);
        };

        let surface = locator.surface_at(position);
        let preview = PlacementPreview {
            pointer: position,
            origin: position.centered_origin(bounds),
            size: bounds,
            page_number: surface.map(|surface| surface.page_number()),
            in_bounds: surface.is_some_and(|surface| surface.rect().contains_centered(position, bounds)),
        };
        self.state = PlacementState::Armed {
            field_type,
            preview: Some(preview),
        };
        self.step(from, PlacementEffect::PreviewUpdated { preview }, None)
    }

    /// Finish the placement at `position`: commit one field or cancel.
    pub fn release<L>(
        &mut self,
        position: PixelPoint,
        context: &mut PlacementContext<'_, L>,
    ) -> PlacementTransition
    where
        L: PageSurfaceLocator + ?Sized,
    {
        let from = self.state;
        let PlacementState::Armed { field_type, .. } = from else {
            return self.noop(from);
        };

        let Some(recipient) = context
            .recipient
            .filter(|recipient| recipient.can_receive_fields())
        else {
            return self.leave(from, field_type, CancelReason::NoRecipient);
        };
        let Some(surface) = context.locator.surface_at(position) else {
            return self.leave(from, field_type, CancelReason::NoSurface);
        };
        let page = surface.rect();
        if !page.contains_centered(position, context.bounds) {
            return self.leave(from, field_type, CancelReason::OutOfBounds);
        }
        let rect = match place_centered(position, context.bounds, &page) {
            Ok(rect) => rect.clamped(),
            Err(error) => {
                debug!(message = "placement.unanchorable", error = %error);
                return self.leave(from, field_type, CancelReason::NoSurface);
            }
        };

        let field = PlacedField::new(
            context.ids.allocate(),
            field_type,
            surface.page_number(),
            rect,
            recipient.email.clone(),
        );
        debug!(
            message = "placement.commit",
            form_id = %field.form_id,
            field_type = %field_type,
            page_number = field.page_number,
            page_x = field.page_x,
            page_y = field.page_y
        );
        self.state = PlacementState::Idle;
        self.step(
            from,
            PlacementEffect::Committed { field },
            Some(ListenerCommand::Unsubscribe),
        )
    }

    /// Route a pointer event to [`pointer_moved`](Self::pointer_moved) or
    /// [`release`](Self::release).
    pub fn apply_pointer<L>(
        &mut self,
        event: &PointerEvent,
        context: &mut PlacementContext<'_, L>,
    ) -> PlacementTransition
    where
        L: PageSurfaceLocator + ?Sized,
    {
        match event.kind {
            PointerEventKind::Move => {
                self.pointer_moved(event.position, context.locator, context.bounds)
            }
            PointerEventKind::Release => self.release(event.position, context),
        }
    }

    /// Abandon an armed placement (navigation, blur, API call).
    ///
    /// Returns `None` when nothing is armed, so repeated calls are harmless.
    pub fn cancel(&mut self, reason: CancelReason) -> Option<PlacementTransition> {
        let from = self.state;
        match from {
            PlacementState::Idle => None,
            PlacementState::Armed { field_type, .. } => Some(self.leave(from, field_type, reason)),
        }
    }

    fn leave(
        &mut self,
        from: PlacementState,
        field_type: FieldType,
        reason: CancelReason,
    ) -> PlacementTransition {
        debug!(
            message = "placement.cancel",
            field_type = %field_type,
            reason = ?reason
        );
        self.state = PlacementState::Idle;
        self.step(
            from,
            PlacementEffect::Canceled { field_type, reason },
            Some(ListenerCommand::Unsubscribe),
        )
    }

    fn noop(&mut self, from: PlacementState) -> PlacementTransition {
        self.step(
            from,
            PlacementEffect::Noop {
                reason: PlacementNoopReason::IdleWithoutPlacement,
            },
            None,
        )
    }

    fn step(
        &mut self,
        from: PlacementState,
        effect: PlacementEffect,
        listener: Option<ListenerCommand>,
    ) -> PlacementTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        PlacementTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state,
            effect,
            listener,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docfield_core::geometry::{PageRect, PixelRect};
    use docfield_core::recipient::{RecipientRole, SendStatus};
    use docfield_core::surface::{PageSurface, SurfaceMap};

    const BOUNDS: PixelSize = PixelSize::new(200.0, 60.0);

    fn pages() -> SurfaceMap {
        let mut map = SurfaceMap::new();
        map.set(PageSurface::new(1, PixelRect::new(100.0, 50.0, 800.0, 600.0)).unwrap());
        map
    }

    fn signer() -> Recipient {
        Recipient::new(1, "signer@example.com", RecipientRole::Signer)
    }

    fn release_at(
        session: &mut PlacementSession,
        x: f64,
        y: f64,
        recipient: Option<&Recipient>,
    ) -> PlacementTransition {
        let map = pages();
        let mut ids = FormIdAllocator::with_seed(7);
        let mut context = PlacementContext {
            locator: &map,
            recipient,
            bounds: BOUNDS,
            ids: &mut ids,
        };
        session.release(PixelPoint::new(x, y), &mut context)
    }

    #[test]
    fn arm_subscribes_once_and_replaces_type() {
        let mut session = PlacementSession::new();
        let first = session.arm(FieldType::Signature);
        assert_eq!(first.transition_id, 1);
        assert_eq!(first.listener, Some(ListenerCommand::Subscribe));
        assert_eq!(first.from, PlacementState::Idle);

        let second = session.arm(FieldType::Date);
        assert_eq!(second.transition_id, 2);
        assert_eq!(second.listener, None);
        assert_eq!(
            second.effect,
            PlacementEffect::Armed {
                field_type: FieldType::Date,
                replaced: Some(FieldType::Signature),
            }
        );
        assert_eq!(session.armed_type(), Some(FieldType::Date));
    }

    #[test]
    fn move_updates_preview_without_creating_fields() {
        let mut session = PlacementSession::new();
        session.arm(FieldType::Text);
        let map = pages();

        let inside = session.pointer_moved(PixelPoint::new(500.0, 350.0), &map, BOUNDS);
        let PlacementEffect::PreviewUpdated { preview } = inside.effect else {
            panic!("expected preview, got {:?}", inside.effect);
        };
        assert!(preview.in_bounds);
        assert_eq!(preview.page_number, Some(1));
        assert_eq!(preview.origin, PixelPoint::new(400.0, 320.0));
        assert!(inside.committed().is_none());

        let edge = session.pointer_moved(PixelPoint::new(150.0, 350.0), &map, BOUNDS);
        assert!(matches!(
            edge.effect,
            PlacementEffect::PreviewUpdated { preview } if !preview.in_bounds && preview.page_number == Some(1)
        ));

        let off_page = session.pointer_moved(PixelPoint::new(10.0, 10.0), &map, BOUNDS);
        assert!(matches!(
            off_page.effect,
            PlacementEffect::PreviewUpdated { preview } if preview.page_number.is_none()
        ));
        assert!(session.is_armed());
    }

    #[test]
    fn release_commits_centred_field() {
        let mut session = PlacementSession::new();
        session.arm(FieldType::Signature);
        let recipient = signer();
        let transition = release_at(&mut session, 500.0, 350.0, Some(&recipient));

        assert_eq!(transition.listener, Some(ListenerCommand::Unsubscribe));
        assert_eq!(transition.to, PlacementState::Idle);
        let field = transition.committed().expect("field committed");
        assert_eq!(field.field_type, FieldType::Signature);
        assert_eq!(field.page_number, 1);
        assert_eq!(field.signer_email, "signer@example.com");
        assert_eq!(field.rect(), PageRect::new(37.5, 45.0, 25.0, 10.0));
        assert_eq!(field.form_id.as_str().len(), 12);
        assert!(field.field_meta.is_none());
        assert!(field.native_id.is_none());
    }

    #[test]
    fn release_outside_any_page_cancels() {
        let mut session = PlacementSession::new();
        session.arm(FieldType::Name);
        let recipient = signer();
        let transition = release_at(&mut session, 5.0, 5.0, Some(&recipient));
        assert_eq!(
            transition.effect,
            PlacementEffect::Canceled {
                field_type: FieldType::Name,
                reason: CancelReason::NoSurface,
            }
        );
        assert_eq!(transition.listener, Some(ListenerCommand::Unsubscribe));
        assert!(!session.is_armed());
    }

    #[test]
    fn release_with_overhang_cancels() {
        let mut session = PlacementSession::new();
        session.arm(FieldType::Email);
        let recipient = signer();
        let transition = release_at(&mut session, 120.0, 350.0, Some(&recipient));
        assert!(matches!(
            transition.effect,
            PlacementEffect::Canceled {
                reason: CancelReason::OutOfBounds,
                ..
            }
        ));
    }

    #[test]
    fn release_without_usable_recipient_cancels() {
        for recipient in [
            None,
            Some(Recipient::new(2, "cc@example.com", RecipientRole::Cc)),
            Some(Recipient::new(3, "viewer@example.com", RecipientRole::Viewer)),
            Some(signer().with_send_status(SendStatus::Sent)),
        ] {
            let mut session = PlacementSession::new();
            session.arm(FieldType::Date);
            let transition = release_at(&mut session, 500.0, 350.0, recipient.as_ref());
            assert!(
                matches!(
                    transition.effect,
                    PlacementEffect::Canceled {
                        reason: CancelReason::NoRecipient,
                        ..
                    }
                ),
                "recipient {recipient:?}"
            );
        }
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut session = PlacementSession::new();
        assert!(session.cancel(CancelReason::Blur).is_none());

        session.arm(FieldType::Checkbox);
        let canceled = session.cancel(CancelReason::Navigation).expect("armed");
        assert_eq!(canceled.listener, Some(ListenerCommand::Unsubscribe));
        assert_eq!(
            canceled.effect,
            PlacementEffect::Canceled {
                field_type: FieldType::Checkbox,
                reason: CancelReason::Navigation,
            }
        );
        assert!(session.cancel(CancelReason::Navigation).is_none());
        assert!(session.cancel(CancelReason::Blur).is_none());
    }

    #[test]
    fn idle_pointer_input_is_noop() {
        let mut session = PlacementSession::new();
        let map = pages();
        let moved = session.pointer_moved(PixelPoint::new(500.0, 350.0), &map, BOUNDS);
        assert_eq!(
            moved.effect,
            PlacementEffect::Noop {
                reason: PlacementNoopReason::IdleWithoutPlacement
            }
        );
        assert_eq!(moved.listener, None);

        let released = release_at(&mut session, 500.0, 350.0, Some(&signer()));
        assert!(matches!(released.effect, PlacementEffect::Noop { .. }));
        assert_eq!(released.transition_id, 2);
    }

    #[test]
    fn cancel_after_commit_is_noop() {
        let mut session = PlacementSession::new();
        session.arm(FieldType::Signature);
        let recipient = signer();
        release_at(&mut session, 500.0, 350.0, Some(&recipient));
        assert!(session.cancel(CancelReason::Blur).is_none());
    }

    #[test]
    fn apply_pointer_dispatches_on_kind() {
        let mut session = PlacementSession::new();
        session.arm(FieldType::Signature);
        let map = pages();
        let mut ids = FormIdAllocator::with_seed(1);
        let recipient = signer();
        let mut context = PlacementContext {
            locator: &map,
            recipient: Some(&recipient),
            bounds: BOUNDS,
            ids: &mut ids,
        };

        let moved = session.apply_pointer(&PointerEvent::moved(500.0, 350.0), &mut context);
        assert!(matches!(moved.effect, PlacementEffect::PreviewUpdated { .. }));
        let released = session.apply_pointer(&PointerEvent::released(500.0, 350.0), &mut context);
        assert!(released.committed().is_some());
        assert_eq!(ids.issued(), 1);
    }
}
