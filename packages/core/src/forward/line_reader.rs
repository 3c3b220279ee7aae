//! Bounded line reads over buffered async streams

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Read one line into `buf`, newline included.
///
/// Stops after `max` bytes even without a newline; the rest of a long line
/// comes back on the next call. Returns the number of bytes read, 0 at EOF.
pub async fn read_line<R>(reader: &mut R, buf: &mut Vec<u8>, max: usize) -> io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(buf.len());
        }

        let room = max.saturating_sub(buf.len());
        let window = &available[..available.len().min(room)];

        let (taken, done) = match window.iter().position(|&b| b == b'\n') {
            Some(newline) => (newline + 1, true),
            None => (window.len(), buf.len() + window.len() >= max),
        };

        buf.extend_from_slice(&window[..taken]);
        reader.consume(taken);

        if done {
            return Ok(buf.len());
        }
    }
}
