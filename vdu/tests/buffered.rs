// SPDX-License-Identifier: Apache-2.0

use std::thread;
use pretty_assertions::assert_eq;
use vdu::{Id, Options, Output, Session, WriterSink};
use vdu::streams::{channel_transport, Duplex, MemoryTransport, void_sink, void_source};
use common::*;

mod common;

#[test]
fn nested_write_then_call() {
	let inner = commands([write(2, &[9, 9]), call(2)]);
	let session = run(commands([write(1, &inner), call(1)]));

	assert_eq!(session.store().get_byte(2, 0), Ok(9));
	assert_eq!(session.store().get_byte(2, 1), Ok(9));
	// Buffer 2 was executed after being written, drawing two tabs.
	assert_eq!(session.screen().vdu, vec![(9, vec![]), (9, vec![])]);
	assert_eq!(session.processor().depth(), 0);
}

#[test]
fn writes_append_segments() {
	let session = run(commands([write(1, &[1, 2]), write(1, &[]), write(1, &[3])]));
	let buffer = session.store().buffer(1).unwrap();
	assert_eq!(buffer.segment_count(), 3);
	assert_eq!(buffer.to_vec(), vec![1, 2, 3]);
	assert_eq!(session.store().get_byte(1, 2), Ok(3));
	assert!(session.store().get_byte(1, 3).is_err());
}

#[test]
fn reserved_ids_are_protected() {
	let session = run(commands([
		write(0, &[0x41, 0x41]),
		write(0xFFFF, &[0x41]),
		create(0, 4),
		create(0xFFFF, 4),
		write(5, &[3]),
	]));

	assert!(!session.store().contains(0));
	assert!(!session.store().contains(0xFFFF));
	assert_eq!(session.store().len(), 1);
	assert_eq!(contents(&session, 5), Some(vec![3]));
	assert!(session.screen().vdu.is_empty());
}

#[test]
fn create_rejects_existing() {
	let session = run(commands([write(1, &[7]), create(1, 4), create(2, 3), create(2, 8)]));
	assert_eq!(contents(&session, 1), Some(vec![7]));
	assert_eq!(contents(&session, 2), Some(vec![0; 3]));
	assert!(session.store().buffer(2).unwrap().segments()[0].is_writable());
}

#[test]
fn clear_is_idempotent() {
	let mut session = run(commands([write(1, &[1]), write(2, &[2]), clear(1)]));
	assert!(!session.store().contains(1));
	assert!(session.store().contains(2));

	session.transport_mut().push(clear(1));
	session.process_all_available();
	assert!(!session.store().contains(1));
	assert_eq!(session.store().len(), 1);

	session.transport_mut().push(commands([clear(0xFFFF), clear(0xFFFF)]));
	session.process_all_available();
	assert!(session.store().is_empty());
	assert_eq!(session.store().used(), 0);
}

#[test]
fn calling_nothing_is_a_no_op() {
	let session = run(commands([call(0xFFFF), call(0), call(9), write(1, &[0x41])]));
	assert_eq!(contents(&session, 1), Some(vec![0x41]));
	assert!(session.screen().vdu.is_empty());
}

#[test]
fn self_call_restarts_without_nesting() {
	// Counts buffer 3 up, calling itself again until the count reaches 5.
	let body = commands([
		adjust(3, 0x03, &[0, 0, 1]),
		conditional(1, 0x04, 3, 0, &[5]),
	]);
	let mut session = session_with(
		commands([create(3, 1), write(1, &body), call(1)]),
		Options::default().with_max_call_depth(1)
	);
	session.process_all_available();

	assert_eq!(session.store().get_byte(3, 0), Ok(5));
}

#[test]
fn depth_limit_unwinds_to_top_level() {
	// Buffers 1 and 2 call each other forever; the byte after the call in buffer 2
	// must never be drawn.
	let mut session = session_with(
		commands([
			write(1, &call(2)),
			write(2, &commands([call(1), vec![0x41]])),
			call(1),
			write(3, &[1]),
		]),
		Options::default().with_max_call_depth(4)
	);
	session.process_all_available();

	assert!(session.screen().vdu.is_empty());
	assert_eq!(contents(&session, 3), Some(vec![1]));
	assert_eq!(session.processor().depth(), 0);
}

#[test]
fn output_redirects_into_buffer() {
	let mut session = run(commands([
		create(4, 4),
		set_output(4),
		general_poll(0x42),
		set_output(0),
		general_poll(0x43),
	]));

	assert!(session.is_initialised());
	assert_eq!(contents(&session, 4), Some(vec![0x80, 1, 0x42, 0]));
	assert_eq!(session.transport_mut().take_output(), vec![0x80, 1, 0x43]);
	assert_eq!(session.processor().output(), Output::Transport);
}

#[test]
fn output_is_inherited_by_calls() {
	let mut session = run(commands([
		create(4, 3),
		write(5, &general_poll(7)),
		set_output(4),
		call(5),
		set_output(0xFFFF),
		call(5),
	]));

	assert_eq!(contents(&session, 4), Some(vec![0x80, 1, 7]));
	assert!(session.transport_mut().take_output().is_empty());
	assert_eq!(session.processor().output(), Output::None);
}

#[test]
fn output_follows_buffer_id() {
	let mut session = run(commands([
		create(4, 3),
		set_output(4),
		clear(4),
		general_poll(1),
		create(4, 3),
		general_poll(2),
	]));

	assert_eq!(contents(&session, 4), Some(vec![0x80, 1, 2]));
	assert!(session.transport_mut().take_output().is_empty());
	assert_eq!(session.processor().output(), Output::Buffer(4));
}

#[test]
fn output_needs_writable_buffer() {
	let mut session = run(commands([
		write(4, &[0, 0, 0]),
		set_output(4),
		set_output(9),
		general_poll(1),
	]));

	assert_eq!(contents(&session, 4), Some(vec![0; 3]));
	assert_eq!(session.transport_mut().take_output(), vec![0x80, 1, 1]);
}

#[test]
fn nested_output_change_is_local() {
	let mut session = run(commands([
		write(5, &commands([set_output(0xFFFF), general_poll(1)])),
		call(5),
		general_poll(2),
	]));

	assert_eq!(session.transport_mut().take_output(), vec![0x80, 1, 2]);
}

#[test]
fn full_output_buffer_drops_bytes() {
	let session = run(commands([create(4, 2), set_output(4), general_poll(9)]));
	assert_eq!(contents(&session, 4), Some(vec![0x80, 1]));
}

#[test]
fn truncated_command_times_out() {
	let mut bytes = buffered(1, 0);
	bytes.extend(word(4));
	bytes.extend([1, 2]);

	let mut session = run(bytes);
	assert!(!session.store().contains(1));

	session.transport_mut().push(write(2, &[1]));
	session.process_all_available();
	assert_eq!(contents(&session, 2), Some(vec![1]));
	assert!(!session.store().contains(1));
}

#[test]
fn allocation_failure_keeps_alignment() {
	let mut session = session_with(
		commands([
			write(1, &[0x41; 8]),
			create(3, 100),
			write(2, &[1, 2]),
		]),
		Options::default().with_memory_limit(4)
	);
	session.process_all_available();

	assert!(!session.store().contains(1));
	assert!(!session.store().contains(3));
	assert_eq!(contents(&session, 2), Some(vec![1, 2]));
	assert_eq!(session.store().used(), 2);
	assert!(session.screen().vdu.is_empty());
}

#[test]
fn screen_commands_pass_through() {
	let body = [
		0x11, 3,               // COLOUR 3
		b'H', b'i',
		0x19, 4, 0, 1, 2, 3,   // PLOT
		0x17, 0x01, 0x00,      // cursor off
		0x17, 0x41, 1, 2, 3, 4, 5, 6, 7, 8,
	];
	let session = run(commands([write(1, &body), call(1), call(1)]));

	let vdu = vec![
		(0x11, vec![3]),
		(b'H', vec![]),
		(b'i', vec![]),
		(0x19, vec![4, 0, 1, 2, 3]),
	];
	let sys = vec![
		(0x01, vec![0]),
		(0x41, vec![1, 2, 3, 4, 5, 6, 7, 8]),
	];
	assert_eq!(session.screen().vdu, [vdu.clone(), vdu].concat());
	assert_eq!(session.screen().sys, [sys.clone(), sys].concat());
}

#[test]
fn debug_info_has_no_effect() {
	let session = run(commands([write(1, &[1, 2]), debug_info(1), debug_info(7)]));
	assert_eq!(contents(&session, 1), Some(vec![1, 2]));
	assert!(session.transport().output().is_empty());
}

#[test]
fn self_modifying_buffer() {
	// Buffer 1 overwrites its own trailing byte before reaching it.
	let mut body = adjust(1, 0x02, &[0, 0, 0x42]);
	let target = body.len() as u16;
	body[7..9].copy_from_slice(&word(target));
	body.push(0x41);

	let session = run(commands([write(1, &body), call(1)]));
	assert_eq!(session.screen().vdu, vec![(0x42, vec![])]);
}

#[test]
fn write_to_self_runs_next_call() {
	// The byte buffer 1 appends to itself isn't part of the call that wrote it.
	let mut session = run(commands([write(1, &write(1, &[0x41])), call(1)]));
	assert!(session.screen().vdu.is_empty());
	assert_eq!(session.store().buffer(1).unwrap().segment_count(), 2);

	session.transport_mut().push(call(1));
	session.process_all_available();
	assert_eq!(session.screen().vdu, vec![(0x41, vec![])]);
	assert_eq!(session.store().buffer(1).unwrap().segment_count(), 3);
}

#[test]
fn clear_self_runs_to_completion() {
	let session = run(commands([
		write(1, &commands([clear(1), write(2, &[7])])),
		call(1),
	]));
	assert!(!session.store().contains(1));
	assert_eq!(contents(&session, 2), Some(vec![7]));
}

#[test]
fn recreate_self_during_call() {
	let session = run(commands([
		write(1, &commands([clear(1), write(1, &[0x41, 0x41]), write(2, &[7])])),
		call(1),
	]));
	assert!(session.screen().vdu.is_empty());
	assert_eq!(contents(&session, 1), Some(vec![0x41, 0x41]));
	assert_eq!(contents(&session, 2), Some(vec![7]));
}

#[test]
fn run_stops_when_drained() {
	let mut session = session(commands([write(1, &[1]), general_poll(5)]));
	session.run();
	assert_eq!(contents(&session, 1), Some(vec![1]));
	assert_eq!(session.transport().output().to_vec(), vec![0x80, 1, 5]);
}

#[test]
fn run_over_channel() {
	let ((host_tx, host_rx), link) = channel_transport();
	let host = thread::spawn(move || {
		for byte in commands([write(1, &general_poll(3)), call(1)]) {
			host_tx.send(byte).unwrap();
		}
		drop(host_tx);
		(0..3).map(|_| host_rx.recv().unwrap()).collect::<Vec<_>>()
	});

	let mut session = Session::new(link);
	session.run();
	assert_eq!(host.join().unwrap(), vec![0x80, 1, 3]);
	assert!(session.store().contains(1));
	assert_eq!(session.processor().id(), Id::None);
}

#[test]
fn run_over_void_returns() {
	let mut session = Session::new(Duplex::new(void_source(), void_sink()));
	session.run();
	assert!(session.store().is_empty());
	assert!(!session.is_initialised());
}

#[test]
fn responses_reach_writer() {
	let link = Duplex::new(MemoryTransport::new(general_poll(0x10)), WriterSink::from(Vec::new()));
	let mut session = Session::new(link);
	session.process_all_available();

	let (link, _) = session.into_parts();
	let (_, sink) = link.into_inner();
	assert_eq!(sink.into_inner(), Some(vec![0x80, 1, 0x10]));
}
