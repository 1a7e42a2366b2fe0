// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Background worker that rewrites rows awaiting reprojection.

use std::{
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
	thread::{self, JoinHandle, ThreadId},
	time::Duration,
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use docrow_type::{Error, Result, diagnostic::internal};
use tracing::{debug, error, trace};

enum ReprojectionMessage {
	/// Run a pass now instead of waiting for the interval.
	Run,
	Shutdown,
}

/// Runs a reprojection pass every `interval` on its own thread.
pub(crate) struct ReprojectionWorker {
	sender: Sender<ReprojectionMessage>,
	running: Arc<AtomicBool>,
	worker: Option<JoinHandle<()>>,
	thread: ThreadId,
}

impl ReprojectionWorker {
	/// Starts the worker. `pass` returns the number of rewritten rows, or
	/// `None` once there is nothing left to work on.
	pub(crate) fn start<F>(interval: Duration, pass: F) -> Result<Self>
	where
		F: Fn() -> Option<Result<usize>> + Send + 'static,
	{
		let (sender, receiver) = bounded(16);
		let running = Arc::new(AtomicBool::new(true));

		let worker_running = Arc::clone(&running);
		let worker = thread::Builder::new()
			.name("docrow-reprojection".to_string())
			.spawn(move || Self::worker_loop(receiver, interval, worker_running, pass))
			.map_err(|e| Error(internal::internal(format!("cannot spawn reprojection worker: {}", e))))?;

		Ok(Self {
			sender,
			running,
			thread: worker.thread().id(),
			worker: Some(worker),
		})
	}

	/// Asks for a pass without waiting for the interval to elapse.
	pub(crate) fn wake(&self) {
		let _ = self.sender.try_send(ReprojectionMessage::Run);
	}

	pub(crate) fn stop(&mut self) {
		if !self.running.swap(false, Ordering::AcqRel) {
			return;
		}

		let _ = self.sender.try_send(ReprojectionMessage::Shutdown);

		// The last store handle may be released by the worker itself.
		if thread::current().id() == self.thread {
			return;
		}
		if let Some(worker) = self.worker.take() {
			let _ = worker.join();
		}
	}

	fn worker_loop<F>(receiver: Receiver<ReprojectionMessage>, interval: Duration, running: Arc<AtomicBool>, pass: F)
	where
		F: Fn() -> Option<Result<usize>>,
	{
		debug!("reprojection worker started");

		while running.load(Ordering::Acquire) {
			match receiver.recv_timeout(interval) {
				Ok(ReprojectionMessage::Run) | Err(RecvTimeoutError::Timeout) => {}
				Ok(ReprojectionMessage::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
			}
			if !running.load(Ordering::Acquire) {
				break;
			}

			match pass() {
				Some(Ok(rewritten)) => trace!(rewritten, "reprojection pass finished"),
				Some(Err(err)) => error!(error = %err, "reprojection pass failed"),
				None => break,
			}
		}

		debug!("reprojection worker stopped");
	}
}

impl Drop for ReprojectionWorker {
	fn drop(&mut self) {
		self.stop();
	}
}
