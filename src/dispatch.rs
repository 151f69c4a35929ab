use log::debug;

use crate::cursor::Cursor;
use crate::error::{DecodeError, Result};
use crate::message::Request;
use crate::schema;

/// Decodes the params map at the cursor with the schema registered for `method`.
///
/// The method is resolved before any params bytes are read, so an unregistered method fails with
/// `UnknownMethod` whatever follows it.
pub fn dispatch(id: u32, method: &str, cursor: &mut Cursor<'_>) -> Result<Request> {
    let schema =
        schema::lookup(method).ok_or_else(|| DecodeError::UnknownMethod(method.to_owned()))?;

    let entries = cursor.read_map_entries()?;
    let params = schema.decode(entries)?;

    debug!("dispatched request {} to {}", id, schema.method);
    Ok(Request::new(id, params))
}
