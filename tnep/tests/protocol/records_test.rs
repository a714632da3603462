use tnep::protocol::{codec, records};
use tnep::{CommunicationMode, Error, ServiceParam, Status, Uri};

#[test]
fn select_uri_roundtrip_keeps_length() {
    let uri = Uri::try_from("svc:one").unwrap();
    let rec = codec::build_select_record(Some(&uri));
    let decoded = codec::decode_select(&rec).unwrap().unwrap();
    assert_eq!(decoded.len(), 7);
    assert_eq!(decoded, uri);
}

#[test]
fn empty_select_means_deselect() {
    let rec = codec::build_select_record(None);
    assert_eq!(rec.payload(), &[0x00]);
    assert_eq!(codec::decode_select(&rec).unwrap(), None);
}

#[test]
fn service_param_record_fields() {
    let param = ServiceParam::new(Uri::try_from("urn:nfc:sn:test").unwrap(), 12, 4)
        .with_max_message_size(0x0200);
    let rec = codec::build_service_param_record(&param);
    assert!(rec.is_well_known(b"Tp"));
    let payload = rec.payload();
    assert_eq!(payload[0], 0x10);
    assert_eq!(payload[1] as usize, "urn:nfc:sn:test".len());
    assert_eq!(&payload[payload.len() - 2..], &[0x02, 0x00]);

    let decoded = codec::decode_service_param(&rec).unwrap();
    assert_eq!(decoded, param);
    assert_eq!(decoded.communication_mode, CommunicationMode::SingleResponse);
}

#[test]
fn service_param_with_lying_uri_length() {
    let mut payload = records::encode_service_param(&ServiceParam::new(
        Uri::try_from("abc").unwrap(),
        0,
        0,
    ));
    payload[1] = 40;
    assert!(matches!(
        records::decode_service_param(&payload),
        Err(Error::ShortBuffer { .. })
    ));
}

#[test]
fn status_classes() {
    assert!(Status::SUCCESS.is_success());
    assert!(!Status::PROTOCOL_ERROR.is_success());
    assert!(Status::new(0x80).is_service_error());
    assert!(Status::new(0xfe).is_service_error());
    assert!(!Status::new(0xff).is_service_error());
    assert_eq!(Status::new(0x81).to_string(), "0x81");

    let rec = codec::build_status_record(Status::new(0x81));
    assert_eq!(codec::decode_status(&rec).unwrap(), Status::new(0x81));
    assert!(matches!(records::decode_status(&[]), Err(Error::Decode(_))));
}

#[test]
fn advertised_services_are_collected_in_order() {
    let params = [
        ServiceParam::new(Uri::try_from("a").unwrap(), 0, 0),
        ServiceParam::new(Uri::try_from("b").unwrap(), 1, 1),
    ];
    let records: Vec<_> = params.iter().map(codec::build_service_param_record).collect();
    let bytes = codec::encode(&records, 128).unwrap();
    let msg = codec::parse_message(&bytes, 16).unwrap();
    assert_eq!(codec::service_params(&msg).unwrap(), params.to_vec());
    assert_eq!(codec::message_status(&msg).unwrap(), None);
}
