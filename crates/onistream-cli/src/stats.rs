// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use onistream::SensorType;
use serde::Serialize;
use std::time::Instant;

/// Summary of a capture run
#[derive(Debug, Clone, Serialize)]
pub struct CaptureMetrics {
    pub sensor: String,
    /// Total number of frames acquired
    pub frames_captured: u64,
    /// Total bytes of converted frame data
    pub bytes_captured: u64,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
    /// Frames per second as seen by the host
    pub throughput_fps: f64,
    /// Frames per second from the sensor timestamps
    pub sensor_fps: f64,
    /// Frames skipped according to the sensor frame index
    pub dropped_frames: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_frame_index: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_frame_index: Option<u64>,
}

/// Collector tracking frame indices and sensor timestamps of a capture
pub struct CaptureStats {
    sensor: SensorType,
    start_time: Instant,
    frames: u64,
    bytes: u64,
    first_index: Option<u64>,
    prev_index: Option<u64>,
    dropped_frames: u64,
    first_timestamp: Option<u64>,
    last_timestamp: Option<u64>,
}

impl CaptureStats {
    pub fn new(sensor: SensorType) -> Self {
        Self {
            sensor,
            start_time: Instant::now(),
            frames: 0,
            bytes: 0,
            first_index: None,
            prev_index: None,
            dropped_frames: 0,
            first_timestamp: None,
            last_timestamp: None,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Record one acquired frame.
    /// Returns the number of frames skipped since the previous one.
    pub fn record(&mut self, frame_index: u64, timestamp_us: u64, bytes: usize) -> u64 {
        let drops = match self.prev_index {
            Some(prev) if frame_index > prev + 1 => frame_index - prev - 1,
            Some(prev) if frame_index <= prev => {
                // stream restarted or index wrapped
                log::warn!("Frame index decreased: {} -> {}", prev, frame_index);
                0
            }
            _ => 0,
        };

        self.frames += 1;
        self.bytes += bytes as u64;
        self.dropped_frames += drops;
        self.first_index.get_or_insert(frame_index);
        self.prev_index = Some(frame_index);
        self.first_timestamp.get_or_insert(timestamp_us);
        self.last_timestamp = Some(timestamp_us);
        drops
    }

    pub fn finalize(&self) -> CaptureMetrics {
        let duration = self.start_time.elapsed();
        let duration_secs = duration.as_secs_f64();

        let throughput_fps = if duration_secs > 0.0 {
            self.frames as f64 / duration_secs
        } else {
            0.0
        };

        let sensor_fps = match (self.first_timestamp, self.last_timestamp) {
            (Some(first), Some(last)) if last > first && self.frames > 1 => {
                (self.frames - 1) as f64 * 1_000_000.0 / (last - first) as f64
            }
            _ => 0.0,
        };

        CaptureMetrics {
            sensor: self.sensor.to_string(),
            frames_captured: self.frames,
            bytes_captured: self.bytes,
            duration_ms: duration.as_millis() as u64,
            throughput_fps,
            sensor_fps,
            dropped_frames: self.dropped_frames,
            first_frame_index: self.first_index,
            last_frame_index: self.prev_index,
        }
    }
}

/// Print metrics in human-readable format
pub fn print_metrics(metrics: &CaptureMetrics) {
    println!("\n=== Capture Summary ===");
    println!("Stream:          {}", metrics.sensor);
    println!("Frames:          {}", metrics.frames_captured);
    println!("Bytes:           {}", metrics.bytes_captured);
    println!("Duration:        {} ms", metrics.duration_ms);
    println!("Throughput:      {:.2} fps", metrics.throughput_fps);
    println!("Sensor rate:     {:.2} fps", metrics.sensor_fps);
    println!("Dropped frames:  {}", metrics.dropped_frames);
    if let (Some(first), Some(last)) = (metrics.first_frame_index, metrics.last_frame_index) {
        println!("Frame indices:   {}..={}", first, last);
    }
}
