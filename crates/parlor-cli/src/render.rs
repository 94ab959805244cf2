//! Plain-text rendering of a [`RoomView`].

use std::io::{self, Write};

use parlor_app::RoomView;

/// Write the title line and, if set, the topic.
///
/// # Errors
///
/// Propagates write failures.
pub fn header<W: Write>(out: &mut W, view: &RoomView) -> io::Result<()> {
    writeln!(out, "# {} ({} members)", view.title(), view.members().len())?;
    if let Some(topic) = view.topic() {
        writeln!(out, "topic: {topic}")?;
    }
    Ok(())
}

/// Write the member list, one `name  id` line per member in display order.
/// The id column is omitted when it equals the name.
///
/// # Errors
///
/// Propagates write failures.
pub fn members<W: Write>(out: &mut W, view: &RoomView) -> io::Result<()> {
    for (name, id) in view.members().entries() {
        if name == id {
            writeln!(out, "  {name}")?;
        } else {
            writeln!(out, "  {name}  {id}")?;
        }
    }
    Ok(())
}

/// Write every timeline item, oldest first.
///
/// # Errors
///
/// Propagates write failures.
pub fn timeline<W: Write>(out: &mut W, view: &RoomView) -> io::Result<()> {
    for item in view.timeline().items() {
        writeln!(out, "{item}")?;
    }
    Ok(())
}
