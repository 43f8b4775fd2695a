//! Integration tests for reading and writing whole EDID blobs.

mod common;

use common::*;
use edid_codec::descriptor::Descriptor;
use edid_codec::established::established_labels;
use edid_codec::types::{ManufactureDate, ScreenSize, VideoInput};
use edid_codec::{checksum, read, write, EdidError, StandardTiming};

mod read_fields {
    use super::*;

    #[test]
    fn test_header_fields() {
        let edid = read(&sample_edid()).unwrap();
        assert_eq!(edid.manufacturer.code, "DEL");
        assert!(!edid.manufacturer.rsvd0);
        assert_eq!(edid.product_code, 0x41A0);
        assert_eq!(edid.serial_number, 0x0102_0304);
        assert_eq!(
            edid.manufactured,
            ManufactureDate::MonthYear {
                month: 12,
                year: 2018
            }
        );
        assert_eq!(edid.edid_version, [1, 4]);
        assert!(edid.valid);
    }

    #[test]
    fn test_display_parameters() {
        let edid = read(&sample_edid()).unwrap();
        assert_eq!(
            edid.video_input,
            VideoInput::Digital {
                color_depth: 2,
                dvi_standard: 5
            }
        );
        assert_eq!(
            edid.screen_size,
            ScreenSize::SizeCm {
                h_size: 60,
                v_size: 34
            }
        );
        assert_eq!(edid.gamma, Some(2.2));

        let fs = edid.feature_support;
        assert!(fs.power_management.active_off);
        assert!(!fs.power_management.standby);
        assert_eq!(fs.color_type, None);
        assert_eq!(fs.color_format, Some(3));
        assert!(fs.preferred_timing);
        assert!(!fs.srgb);
    }

    #[test]
    fn test_timings() {
        let edid = read(&sample_edid()).unwrap();
        assert_eq!(
            established_labels(edid.established_timings),
            vec!["640 x 480 @ 60", "1024 x 768 @ 60"]
        );
        assert_eq!(
            edid.standard_timings[0],
            Some(StandardTiming {
                h_active8: 240,
                aspect_ratio: 3,
                refresh_rate: 60
            })
        );
        let first = edid.standard_timings[0].unwrap();
        assert_eq!((first.h_active(), first.v_active()), (1920, 1080));
        assert!(edid.standard_timings[4..].iter().all(Option::is_none));
    }

    #[test]
    fn test_descriptors() {
        let edid = read(&sample_edid()).unwrap();
        match &edid.descriptors[0] {
            Descriptor::DetailedTiming(dtd) => {
                assert_eq!(dtd.timings.pixel_clock, 148.5);
                assert_eq!(dtd.timings.h_active, 1920);
            }
            other => panic!("expected detailed timing, got {:?}", other),
        }
        match &edid.descriptors[1] {
            Descriptor::RangeLimits(rl) => {
                assert_eq!((rl.v_min_rate, rl.v_max_rate), (56, 76));
                assert_eq!((rl.h_min_rate, rl.h_max_rate), (30, 83));
                assert_eq!(rl.max_pixel_clock, 170);
            }
            other => panic!("expected range limits, got {:?}", other),
        }
        assert_eq!(edid.descriptors[2], Descriptor::product_name("DELL U2718Q"));
        assert_eq!(edid.descriptors[3], Descriptor::serial_number("ABC123456789"));
    }

    #[test]
    fn test_extensions_are_kept_raw() {
        let edid = read(&sample_edid()).unwrap();
        assert_eq!(edid.extensions, vec![extension_block()]);
    }

    #[test]
    fn test_model_year() {
        let mut bytes = sample_edid();
        bytes[0x10] = 0xFF;
        bytes[0x7F] = checksum::compute(&bytes[..0x7F]);
        let edid = read(&bytes).unwrap();
        assert_eq!(edid.manufactured, ManufactureDate::ModelYear { year: 2018 });
        assert_eq!(write(&edid).unwrap(), bytes);
    }
}

mod read_errors {
    use super::*;

    #[test]
    fn test_too_short() {
        let bytes = sample_edid();
        assert_eq!(read(&bytes[..127]), Err(EdidError::TooShort { len: 127 }));
    }

    #[test]
    fn test_bad_header() {
        let mut bytes = sample_edid();
        bytes[7] = 0xFF;
        assert_eq!(read(&bytes), Err(EdidError::BadHeader));
    }

    #[test]
    fn test_length_mismatch() {
        let bytes = sample_edid();
        assert_eq!(
            read(&bytes[..128]),
            Err(EdidError::LengthMismatch {
                extensions: 1,
                expected: 256,
                actual: 128
            })
        );
    }
}

mod round_trip {
    use super::*;

    #[test]
    fn test_identity() {
        let bytes = sample_edid();
        assert_eq!(write(&read(&bytes).unwrap()).unwrap(), bytes);
    }

    #[test]
    fn test_bad_checksum_is_preserved() {
        let mut bytes = sample_edid();
        bytes[0x7F] = bytes[0x7F].wrapping_add(1);
        let edid = read(&bytes).unwrap();
        assert!(!edid.valid);
        assert_eq!(edid.checksum, bytes[0x7F]);
        assert_eq!(write(&edid).unwrap(), bytes);
    }

    #[test]
    fn test_marking_valid_repairs_checksum() {
        let mut bytes = sample_edid();
        let good = bytes[0x7F];
        bytes[0x7F] = good ^ 0x55;
        let mut edid = read(&bytes).unwrap();
        edid.valid = true;
        let out = write(&edid).unwrap();
        assert_eq!(out[0x7F], good);
        assert!(checksum::validate(&out));
    }

    #[test]
    fn test_unknown_descriptor_is_opaque() {
        let mut bytes = sample_edid();
        let mut slot = [0u8; 18];
        slot[3] = 0x42;
        slot[5..].copy_from_slice(&[0xA5; 13]);
        bytes[0x6C..0x7E].copy_from_slice(&slot);
        bytes[0x7F] = checksum::compute(&bytes[..0x7F]);

        let edid = read(&bytes).unwrap();
        assert_eq!(edid.descriptors[3], Descriptor::Opaque(slot));
        assert_eq!(write(&edid).unwrap(), bytes);
    }

    #[test]
    fn test_portrait_square_aspect_ratio() {
        let mut bytes = sample_edid();
        bytes[0x15] = 0x00;
        bytes[0x16] = 0x01;
        bytes[0x7F] = checksum::compute(&bytes[..0x7F]);

        let edid = read(&bytes).unwrap();
        assert_eq!(
            edid.screen_size,
            ScreenSize::AspectRatio {
                num: 100,
                den: 100,
                portrait: true
            }
        );
        assert_eq!(write(&edid).unwrap(), bytes);
    }

    #[test]
    fn test_range_limits_flagged_zero_rate() {
        let mut bytes = sample_edid();
        bytes[0x48 + 4] = 0x02;
        bytes[0x48 + 6] = 0x00;
        bytes[0x7F] = checksum::compute(&bytes[..0x7F]);

        let edid = read(&bytes).unwrap();
        let Descriptor::RangeLimits(rl) = &edid.descriptors[1] else {
            panic!("expected range limits, got {:?}", edid.descriptors[1]);
        };
        assert_eq!(rl.v_max_rate, 255);
        assert_eq!(write(&edid).unwrap(), bytes);
    }

    #[test]
    fn test_edited_record() {
        let mut edid = read(&sample_edid()).unwrap();
        edid.descriptors[2] = Descriptor::product_name("PANEL");
        edid.descriptors[3] = Descriptor::dummy();
        edid.extensions.clear();

        let out = write(&edid).unwrap();
        assert_eq!(out.len(), 128);
        assert_eq!(out[0x7E], 0);
        assert!(checksum::validate(&out));
        assert_eq!(&out[0x5A + 5..0x5A + 18], b"PANEL\n       ");
        assert_eq!(&out[0x6C..0x7E], &[0, 0, 0, 0x10, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

        let back = read(&out).unwrap();
        assert_eq!(back.descriptors[2], Descriptor::product_name("PANEL"));
        assert_eq!(back.descriptors[3], Descriptor::dummy());
    }
}

mod write_errors {
    use super::*;

    #[test]
    fn test_extension_size() {
        let mut edid = read(&sample_edid()).unwrap();
        edid.extensions.push(vec![0u8; 64]);
        assert_eq!(
            write(&edid),
            Err(EdidError::ExtensionSize { index: 1, len: 64 })
        );
    }

    #[test]
    fn test_too_many_extensions() {
        let mut edid = read(&sample_edid()).unwrap();
        edid.extensions = vec![vec![0u8; 128]; 256];
        assert_eq!(write(&edid), Err(EdidError::TooManyExtensions(256)));
    }

    #[test]
    fn test_string_too_long() {
        let mut edid = read(&sample_edid()).unwrap();
        edid.descriptors[2] = Descriptor::product_name("FOURTEEN CHARS");
        assert_eq!(
            write(&edid),
            Err(EdidError::StringTooLong("FOURTEEN CHARS".to_string()))
        );
    }

    #[test]
    fn test_standard_timing_range() {
        let mut edid = read(&sample_edid()).unwrap();
        edid.standard_timings[5] = Some(StandardTiming {
            h_active8: 300,
            aspect_ratio: 0,
            refresh_rate: 60,
        });
        assert!(matches!(
            write(&edid),
            Err(EdidError::FieldRange {
                field: "standard_timing.h_active8",
                ..
            })
        ));
    }

    #[test]
    fn test_year_range() {
        let mut edid = read(&sample_edid()).unwrap();
        edid.manufactured = ManufactureDate::ModelYear { year: 1989 };
        assert!(matches!(
            write(&edid),
            Err(EdidError::FieldRange {
                field: "manufactured.year",
                ..
            })
        ));
    }
}
