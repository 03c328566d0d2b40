use crate::addr::Port;
use crate::error::{LinkDirection, StackError};
use crate::proto::{HEADER_LEN, MAX_PAYLOAD, UdpProtocol, UdpSegment};
use crate::stack::{Chain, ChainBuilder, LayerId, Protocol};

fn udp_layer(mss: usize) -> UdpProtocol {
    UdpProtocol::new(mss, Port::new(4040), Port::new(8080)).expect("udp layer")
}

fn udp_chain(mss: usize) -> Chain {
    ChainBuilder::new()
        .push(Box::new(udp_layer(mss)))
        .build()
        .expect("chain")
}

// Split a concatenated segment stream at the boundaries its length
// fields declare.
fn split_segments(wire: &[u8]) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    let mut rest = wire;
    while !rest.is_empty() {
        let bits = u16::from_be_bytes([rest[6], rest[7]]);
        let total = usize::from(bits / 8);
        out.push(rest[..total].to_vec());
        rest = &rest[total..];
    }
    out
}

#[test]
fn round_trip_at_mss_boundaries() {
    let mss = 4;
    let chain = udp_chain(mss);
    for len in [mss - 1, mss, mss + 1, 3 * mss] {
        let payload: Vec<u8> = (0..len).map(|i| i as u8).collect();
        let wire = chain.transmit(&payload).expect("transmit");
        let restored = chain.receive(&wire).expect("receive");
        assert_eq!(restored, payload, "round trip at len {len}");
    }
}

#[test]
fn encapsulate_produces_ceil_div_segments_with_running_sequence() {
    let chain = udp_chain(4);
    let payload: Vec<u8> = (0..10).collect();
    let wire = chain.transmit(&payload).unwrap();
    assert_eq!(wire.len(), 10 + 3 * HEADER_LEN);

    let segments = split_segments(&wire);
    assert_eq!(segments.len(), 3);
    for (i, raw) in segments.iter().enumerate() {
        let seg = UdpSegment::from_bytes(raw).unwrap();
        assert_eq!(seg.sequence_number(), i as u16);
        let expected_len = if i < 2 { 4 } else { 2 };
        assert_eq!(seg.payload().len(), expected_len);
    }
}

#[test]
fn multiple_of_mss_payload_has_no_empty_trailing_segment() {
    let chain = udp_chain(4);
    let wire = chain.transmit(&[7u8; 8]).unwrap();
    let segments = split_segments(&wire);
    assert_eq!(segments.len(), 2);
    assert!(segments.iter().all(|raw| raw.len() == 4 + HEADER_LEN));
}

#[test]
fn payload_shorter_than_mss_yields_single_segment() {
    let chain = udp_chain(100);
    let wire = chain.transmit(b"hi").unwrap();
    let segments = split_segments(&wire);
    assert_eq!(segments.len(), 1);
    let seg = UdpSegment::from_bytes(&segments[0]).unwrap();
    assert_eq!(seg.sequence_number(), 0);
    assert_eq!(seg.payload(), b"hi");
}

#[test]
fn abcdefgh_with_mss_four_splits_into_two_known_segments() {
    let chain = udp_chain(4);
    let wire = chain.transmit(b"ABCDEFGH").unwrap();

    let segments = split_segments(&wire);
    assert_eq!(segments.len(), 2);
    let first = UdpSegment::from_bytes(&segments[0]).unwrap();
    let second = UdpSegment::from_bytes(&segments[1]).unwrap();
    assert_eq!(first.sequence_number(), 0);
    assert_eq!(first.payload(), b"ABCD");
    assert_eq!(second.sequence_number(), 1);
    assert_eq!(second.payload(), b"EFGH");

    // Either on-wire order reassembles to the original payload.
    let in_order = [segments[0].clone(), segments[1].clone()].concat();
    let swapped = [segments[1].clone(), segments[0].clone()].concat();
    assert_eq!(chain.receive(&in_order).unwrap(), b"ABCDEFGH".to_vec());
    assert_eq!(chain.receive(&swapped).unwrap(), b"ABCDEFGH".to_vec());
}

#[test]
fn decapsulate_is_invariant_under_segment_permutations() {
    let chain = udp_chain(4);
    let payload: Vec<u8> = (0..9).collect();
    let wire = chain.transmit(&payload).unwrap();
    let segments = split_segments(&wire);
    assert_eq!(segments.len(), 3);

    let orders: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    for order in orders {
        let shuffled: Vec<u8> = order.iter().flat_map(|&i| segments[i].clone()).collect();
        assert_eq!(chain.receive(&shuffled).unwrap(), payload, "order {order:?}");
    }
}

#[test]
fn duplicate_sequence_numbers_pass_through_in_input_order() {
    let chain = udp_chain(4);
    let a = UdpSegment::new(Port::new(1), Port::new(2), 0, b"AB".to_vec()).unwrap();
    let b = UdpSegment::new(Port::new(1), Port::new(2), 0, b"CD".to_vec()).unwrap();
    let wire = [a.to_bytes(), b.to_bytes()].concat();
    assert_eq!(chain.receive(&wire).unwrap(), b"ABCD".to_vec());
}

#[test]
fn sequence_gaps_are_not_filled() {
    let chain = udp_chain(4);
    let hi = UdpSegment::new(Port::new(1), Port::new(2), 5, b"later".to_vec()).unwrap();
    let lo = UdpSegment::new(Port::new(1), Port::new(2), 2, b"first".to_vec()).unwrap();
    let wire = [hi.to_bytes(), lo.to_bytes()].concat();
    assert_eq!(chain.receive(&wire).unwrap(), b"firstlater".to_vec());
}

#[test]
fn trailing_bytes_that_cannot_form_a_header_are_rejected() {
    let chain = udp_chain(4);
    let mut wire = chain.transmit(b"ABCD").unwrap();
    wire.extend_from_slice(&[0xFF, 0xFF, 0xFF]);
    assert!(matches!(
        chain.receive(&wire).unwrap_err(),
        StackError::MalformedFrame(_)
    ));
}

#[test]
fn truncated_segment_aborts_the_whole_call() {
    let chain = udp_chain(4);
    let wire = chain.transmit(b"ABCDEFGH").unwrap();
    // Drop the last payload byte of the final segment.
    assert!(matches!(
        chain.receive(&wire[..wire.len() - 1]).unwrap_err(),
        StackError::MalformedFrame(_)
    ));
}

#[test]
fn empty_buffers_are_invalid_in_both_directions() {
    let chain = udp_chain(4);
    assert!(matches!(
        chain.transmit(b"").unwrap_err(),
        StackError::InvalidArgument(_)
    ));
    assert!(matches!(
        chain.receive(b"").unwrap_err(),
        StackError::InvalidArgument(_)
    ));
}

#[test]
fn unlinked_udp_layer_reports_missing_links() {
    let chain = Chain::from_layers(vec![Box::new(udp_layer(4))]);
    let enc = chain.encapsulate_at(LayerId(0), b"payload").unwrap_err();
    assert!(matches!(
        enc,
        StackError::MissingLink {
            direction: LinkDirection::Next,
            ..
        }
    ));
    let dec = chain.decapsulate_at(LayerId(0), b"payload").unwrap_err();
    assert!(matches!(
        dec,
        StackError::MissingLink {
            direction: LinkDirection::Previous,
            ..
        }
    ));
}

#[test]
fn stale_layer_handle_is_an_internal_failure() {
    let mut udp = udp_layer(4);
    udp.set_next(LayerId(7));
    let chain = Chain::from_layers(vec![Box::new(udp)]);
    assert!(matches!(
        chain.encapsulate_at(LayerId(0), b"x").unwrap_err(),
        StackError::InternalFailure(_)
    ));
}

#[test]
fn mss_validation_bounds() {
    assert!(matches!(
        UdpProtocol::new(0, Port::new(1), Port::new(2)).unwrap_err(),
        StackError::InvalidArgument(_)
    ));
    assert!(UdpProtocol::new(MAX_PAYLOAD, Port::new(1), Port::new(2)).is_ok());
    assert!(UdpProtocol::new(MAX_PAYLOAD + 1, Port::new(1), Port::new(2)).is_err());
}

#[test]
fn extract_ports_reads_header_prefix_only() {
    let seg = UdpSegment::new(Port::new(4040), Port::new(8080), 9, b"data".to_vec()).unwrap();
    let bytes = seg.to_bytes();
    assert_eq!(UdpProtocol::extract_source(&bytes).unwrap(), Port::new(4040));
    assert_eq!(
        UdpProtocol::extract_destination(&bytes).unwrap(),
        Port::new(8080)
    );
    // Four header bytes are enough even without the rest of the segment.
    assert_eq!(
        UdpProtocol::extract_source(&bytes[..4]).unwrap(),
        Port::new(4040)
    );
}

#[test]
fn extract_ports_need_at_least_four_bytes() {
    assert!(matches!(
        UdpProtocol::extract_source(&[1, 2, 3]).unwrap_err(),
        StackError::InvalidArgument(_)
    ));
    assert!(matches!(
        UdpProtocol::extract_destination(&[1, 2, 3]).unwrap_err(),
        StackError::InvalidArgument(_)
    ));
}

#[test]
fn copied_layer_keeps_config_but_drops_links() {
    let mut udp = udp_layer(4);
    udp.set_next(LayerId(1));
    udp.set_previous(LayerId(0));
    let copy = udp.boxed_copy();
    assert_eq!(copy.name(), "udp");
    assert!(copy.next().is_none());
    assert!(copy.previous().is_none());
}
