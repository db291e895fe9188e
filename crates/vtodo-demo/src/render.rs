#![forbid(unsafe_code)]

//! Frame output, as text rows or one JSON object per frame.

use std::io::Write;

use serde_json::{Value, json};
use vtodo::{MaterializedRows, MaterializerStats, RowChange};

use crate::error::Result;

/// Write one frame. Text mode prints a header, one line per row, then the
/// patch; JSON mode prints a single line.
pub fn write_frame(
    out: &mut impl Write,
    frame: &MaterializedRows,
    revision: u64,
    json: bool,
) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, &frame_json(frame, revision))?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "frame rev={revision} rows={} built={} removed={} evicted={}",
        frame.rows.len(),
        frame.built_count(),
        frame.removed_count(),
        frame.evicted_count(),
    )?;
    for row in &frame.rows {
        let mark = if row.item.checked { 'x' } else { ' ' };
        writeln!(
            out,
            "  [{mark}] {:>6} @{:<9} {}",
            row.key.get(),
            row.position_offset,
            row.item.text
        )?;
    }
    if !frame.patch.is_empty() {
        let patch: Vec<String> = frame.patch.iter().map(patch_token).collect();
        writeln!(out, "patch: {}", patch.join(" "))?;
    }
    Ok(())
}

/// `+key@index` for a build, `-key` for a row leaving the window, `~key`
/// for an eviction.
fn patch_token(change: &RowChange) -> String {
    match change {
        RowChange::Built { key, index } => format!("+{key}@{index}"),
        RowChange::Removed { key } => format!("-{key}"),
        RowChange::Evicted { key } => format!("~{key}"),
    }
}

pub fn frame_json(frame: &MaterializedRows, revision: u64) -> Value {
    let rows: Vec<Value> = frame
        .rows
        .iter()
        .map(|row| {
            json!({
                "key": row.key.get(),
                "index": row.index,
                "offset": row.position_offset,
                "text": row.item.text,
                "checked": row.item.checked,
            })
        })
        .collect();
    let patch: Vec<Value> = frame
        .patch
        .iter()
        .map(|change| match change {
            RowChange::Built { key, index } => json!({"built": {"key": key.get(), "index": index}}),
            RowChange::Removed { key } => json!({"removed": {"key": key.get()}}),
            RowChange::Evicted { key } => json!({"evicted": {"key": key.get()}}),
        })
        .collect();
    json!({
        "revision": revision,
        "rows": rows,
        "patch": patch,
    })
}

pub fn write_stats(
    out: &mut impl Write,
    frames: usize,
    rows_built: usize,
    stats: &MaterializerStats,
    json: bool,
) -> Result<()> {
    if json {
        let value = json!({
            "frames": frames,
            "rows_built": rows_built,
            "passes": stats.passes,
            "hits": stats.hits,
            "misses": stats.misses,
            "removals": stats.removals,
            "evictions": stats.evictions,
            "item_changed": stats.item_changed,
            "moved": stats.moved,
            "callbacks_changed": stats.callbacks_changed,
        });
        serde_json::to_writer(&mut *out, &value)?;
        writeln!(out)?;
    } else {
        writeln!(
            out,
            "frames={frames} rows_built={rows_built} hits={} misses={} evictions={} moved={} item_changed={}",
            stats.hits, stats.misses, stats.evictions, stats.moved, stats.item_changed
        )?;
    }
    Ok(())
}
