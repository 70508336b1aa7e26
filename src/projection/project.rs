use serde_json::{Map, Value};

use super::context::{ProjectionContext, SelectionSpec};

/// An output shape that can be projected field-by-field.
///
/// Implementors declare their full field list once, in output order, and
/// render one field at a time. Rendering is only invoked for fields that
/// survive the selection, so computed fields cost nothing when they are not
/// asked for. `Env` carries whatever request-scoped collaborators rendering
/// needs (viewer identity, URL signer); the engine itself never looks
/// inside it.
pub trait Projectable {
    type Env: ?Sized;

    /// Every field this shape can emit, in its declared output order.
    fn declared_fields(&self) -> &'static [&'static str];

    /// Render a single declared field. Relation fields recurse through
    /// [`project`] themselves, passing the same shared context. Returning
    /// `None` omits the key entirely.
    fn render_field(&self, name: &str, ctx: &ProjectionContext, env: &Self::Env) -> Option<Value>;
}

/// Project one entity into a JSON object.
///
/// With no selection, every declared field is rendered. With a selection,
/// only the declared fields it names are rendered - selection entries that
/// match nothing declared are silently ignored, and output order is always
/// the declared order, not the selection order. Pure transform: the entity
/// is a read-only snapshot and `ctx` is never mutated, so concurrent
/// requests can project freely.
pub fn project<P: Projectable>(
    entity: &P,
    selection: Option<&SelectionSpec>,
    ctx: &ProjectionContext,
    env: &P::Env,
) -> Value {
    let mut out = Map::new();
    for &name in entity.declared_fields() {
        if let Some(sel) = selection {
            if !sel.contains(name) {
                continue;
            }
        }
        if let Some(value) = entity.render_field(name, ctx, env) {
            out.insert(name.to_string(), value);
        }
    }
    Value::Object(out)
}

/// Project a collection, preserving the ordering established upstream.
pub fn project_all<P: Projectable>(
    entities: &[P],
    selection: Option<&SelectionSpec>,
    ctx: &ProjectionContext,
    env: &P::Env,
) -> Value {
    Value::Array(entities.iter().map(|e| project(e, selection, ctx, env)).collect())
}
