//! Shared utilities for CLI commands

use sentinel_core::Metadata;

/// Format a byte count for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Human-readable size of a described file, or a dash when absent
pub fn format_metadata_size(metadata: &Metadata) -> String {
    metadata
        .size()
        .map(format_size)
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::Descriptor;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1.00 GB");
        assert_eq!(format_size(1536), "1.50 KB");
    }

    #[test]
    fn test_format_metadata_size() {
        let present = Metadata::Present(Descriptor {
            size_bytes: 2048,
            permissions: "-rw-r--r--".into(),
        });
        assert_eq!(format_metadata_size(&present), "2.00 KB");
        assert_eq!(format_metadata_size(&Metadata::Absent), "-");
    }
}
