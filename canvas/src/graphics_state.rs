use crate::error::*;
use crate::geometry::*;
use crate::transform::*;

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of the IDs for saved states (shared by every stack, so a token only ever matches the stack that issued it)
static NEXT_STATE_ID: AtomicU64 = AtomicU64::new(1);

///
/// Identifies a state saved by `GraphicsStateStack::save()`
///
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct StateToken(pub u64);

///
/// Identifies a container opened by `GraphicsStateStack::begin_container()`
///
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct ContainerToken(pub u64);

///
/// How an entry came to be on the state stack
///
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StateKind {
    Save,
    Container,
}

///
/// A snapshot of the graphics state, as stored on the stack
///
#[derive(Clone, Debug)]
pub struct GraphicsState<TExternal> {
    /// Identifier for this entry (the value in the token that was returned when it was pushed)
    id:         u64,

    /// Whether this was pushed by a save or by a container
    kind:       StateKind,

    /// The user transform at the point where this state was pushed
    transform:  AffineTransform,

    /// State belonging to whatever is using the stack (eg, a handle for the state of a native surface)
    external:   TExternal,
}

///
/// Tracks the user transform along with a stack of saved states
///
/// Entries are pushed by `save()` or `begin_container()` and popped by `restore()` or `end_container()`.
/// Restoring a state also removes every state that was pushed after it.
///
#[derive(Clone, Debug)]
pub struct GraphicsStateStack<TExternal = ()> {
    transform:  AffineTransform,
    stack:      Vec<GraphicsState<TExternal>>,
}

impl<TExternal> GraphicsState<TExternal> {
    #[inline] pub fn kind(&self) -> StateKind               { self.kind }
    #[inline] pub fn transform(&self) -> &AffineTransform   { &self.transform }
    #[inline] pub fn external(&self) -> &TExternal          { &self.external }
    #[inline] pub fn into_external(self) -> TExternal       { self.external }

    ///
    /// The token that was returned for this state, if it was pushed by `save()`
    ///
    pub fn state_token(&self) -> Option<StateToken> {
        match self.kind {
            StateKind::Save         => Some(StateToken(self.id)),
            StateKind::Container    => None,
        }
    }

    ///
    /// The token that was returned for this state, if it was pushed by `begin_container()`
    ///
    pub fn container_token(&self) -> Option<ContainerToken> {
        match self.kind {
            StateKind::Save         => None,
            StateKind::Container    => Some(ContainerToken(self.id)),
        }
    }
}

impl<TExternal> GraphicsStateStack<TExternal> {
    ///
    /// Creates an empty stack with the identity as the user transform
    ///
    pub fn new() -> GraphicsStateStack<TExternal> {
        GraphicsStateStack {
            transform:  AffineTransform::identity(),
            stack:      vec![],
        }
    }

    /// The current user transform
    #[inline] pub fn transform(&self) -> &AffineTransform { &self.transform }

    /// The number of states that are currently saved
    #[inline] pub fn depth(&self) -> usize { self.stack.len() }

    ///
    /// Replaces the current user transform
    ///
    pub fn set_transform(&mut self, transform: AffineTransform) {
        self.transform = transform;
    }

    ///
    /// Combines a transform into the user transform
    ///
    pub fn multiply_transform(&mut self, transform: &AffineTransform, order: MatrixOrder) {
        self.transform.multiply_by(transform, order);
    }

    ///
    /// Pushes an entry onto the stack, returning its ID
    ///
    fn push(&mut self, kind: StateKind, external: TExternal) -> u64 {
        let id = NEXT_STATE_ID.fetch_add(1, Ordering::Relaxed);

        self.stack.push(GraphicsState {
            id:         id,
            kind:       kind,
            transform:  self.transform,
            external:   external,
        });

        id
    }

    ///
    /// Pops the entry with the specified ID and everything above it, returning the popped entries with the most recent first
    ///
    fn pop_to(&mut self, id: u64, kind: StateKind) -> CanvasResult<Vec<GraphicsState<TExternal>>> {
        let index = self.stack.iter()
            .rposition(|state| state.id == id)
            .ok_or_else(|| CanvasError::InvalidState(format!("state {} is not on the stack (already restored, or from another graphics object)", id)))?;

        if self.stack[index].kind != kind {
            return Err(CanvasError::InvalidState(format!("state {} was pushed as a {:?}, but is being closed as a {:?}", id, self.stack[index].kind, kind)));
        }

        let mut popped = self.stack.split_off(index);
        popped.reverse();

        if let Some(baseline) = popped.last() {
            self.transform = baseline.transform;
        }

        Ok(popped)
    }

    ///
    /// Saves the current state, returning a token that can be used to restore it later on
    ///
    pub fn save(&mut self, external: TExternal) -> StateToken {
        StateToken(self.push(StateKind::Save, external))
    }

    ///
    /// Restores a saved state, along with any state that was saved after it
    ///
    /// The popped states are returned in the order they were removed (ie, the most recently saved state is first)
    ///
    pub fn restore(&mut self, token: StateToken) -> CanvasResult<Vec<GraphicsState<TExternal>>> {
        self.pop_to(token.0, StateKind::Save)
    }

    ///
    /// Removes the most recent entry from the stack, whether it was pushed by `save()` or `begin_container()`
    ///
    pub fn restore_last(&mut self) -> CanvasResult<GraphicsState<TExternal>> {
        let state       = self.stack.pop().ok_or_else(|| CanvasError::InvalidState("restore called with no saved state".to_string()))?;
        self.transform  = state.transform;

        Ok(state)
    }

    ///
    /// Opens a container that maps the source rectangle onto the destination rectangle
    ///
    /// The mapping is applied in the local space of the current transform, so drawing in the container uses
    /// coordinates from the source rectangle. `end_container()` returns to the transform from before this call.
    ///
    pub fn begin_container(&mut self, dest: Rect, source: Rect, external: TExternal) -> CanvasResult<ContainerToken> {
        let mapping = container_transform(dest, source)?;
        let id      = self.push(StateKind::Container, external);

        self.transform.multiply_by(&mapping, MatrixOrder::Prepend);

        Ok(ContainerToken(id))
    }

    ///
    /// Closes a container, and any state that was pushed after it
    ///
    pub fn end_container(&mut self, token: ContainerToken) -> CanvasResult<Vec<GraphicsState<TExternal>>> {
        self.pop_to(token.0, StateKind::Container)
    }

    ///
    /// Removes every entry from the stack, returning to the transform from before the first save
    ///
    pub fn clear(&mut self) -> Vec<GraphicsState<TExternal>> {
        let mut popped = self.stack.split_off(0);
        popped.reverse();

        if let Some(baseline) = popped.last() {
            self.transform = baseline.transform;
        }

        popped
    }
}

impl<TExternal> Default for GraphicsStateStack<TExternal> {
    fn default() -> Self {
        GraphicsStateStack::new()
    }
}

///
/// The transform that maps the source rectangle onto the destination rectangle
///
/// This moves the source origin to 0,0, scales it to the size of the destination and moves it to the
/// destination origin.
///
pub fn container_transform(dest: Rect, source: Rect) -> CanvasResult<AffineTransform> {
    dest.check_finite("container destination")?;
    source.check_finite("container source")?;

    if source.width == 0.0 || source.height == 0.0 {
        return Err(CanvasError::ArgumentError(format!("container source rectangle must have a size (found {:?})", source)));
    }

    let mut mapping = AffineTransform::translation(-source.x, -source.y);
    mapping.scale(dest.width / source.width, dest.height / source.height, MatrixOrder::Append);
    mapping.translate(dest.x, dest.y, MatrixOrder::Append);

    Ok(mapping)
}
