//! Property tests for command encoding.
//!
//! These tests verify that every encodable command has the exact wire shape
//! and survives arbitrary write fragmentation on its way to the socket.

#[cfg(test)]
mod tests {
    use crate::command::{Command, CommandEncoder, MAX_COMMAND_LEN};
    use crate::io::PxOutStream;
    use pixelflut_common::{Point, Rgb};
    use proptest::prelude::*;
    use std::io::{self, Write};

    /// A writer that accepts at most `chunk` bytes per call.
    ///
    /// This simulates a congested socket that only takes part of each write.
    struct FragmentingWriter {
        data: Vec<u8>,
        chunk: usize,
    }

    impl Write for FragmentingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.chunk);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn arbitrary_command() -> impl Strategy<Value = Command> {
        (any::<u32>(), any::<u32>(), any::<[u8; 3]>())
            .prop_map(|(x, y, [r, g, b])| Command::new(Point::new(x, y), Rgb::new(r, g, b)))
    }

    /// Checks `^PX \d+ \d+ [0-9A-F]{6}\n$` without a regex engine.
    fn has_wire_shape(bytes: &[u8]) -> bool {
        let Some(body) = bytes.strip_prefix(b"PX ").and_then(|b| b.strip_suffix(b"\n")) else {
            return false;
        };
        let fields: Vec<&[u8]> = body.split(|&b| b == b' ').collect();
        fields.len() == 3
            && !fields[0].is_empty()
            && fields[0].iter().all(u8::is_ascii_digit)
            && !fields[1].is_empty()
            && fields[1].iter().all(u8::is_ascii_digit)
            && fields[2].len() == 6
            && fields[2]
                .iter()
                .all(|c| c.is_ascii_digit() || (b'A'..=b'F').contains(c))
    }

    proptest! {
        /// Every command matches the wire pattern and decodes to its inputs.
        #[test]
        fn test_encode_shape_and_decode(cmd in arbitrary_command()) {
            let mut encoder = CommandEncoder::new();
            let bytes = encoder.encode(cmd.position, cmd.color);

            prop_assert!(bytes.len() <= MAX_COMMAND_LEN);
            prop_assert!(has_wire_shape(bytes), "bad shape: {:?}", String::from_utf8_lossy(bytes));
            prop_assert_eq!(Command::parse(bytes).unwrap(), cmd);
        }

        /// Coordinates never carry leading zeros.
        #[test]
        fn test_no_leading_zeros(x in 0u32..100_000, y in 0u32..100_000) {
            let mut encoder = CommandEncoder::new();
            let text = String::from_utf8(encoder.encode(Point::new(x, y), Rgb::BLACK).to_vec()).unwrap();
            prop_assert_eq!(text, format!("PX {} {} 000000\n", x, y));
        }

        /// A sequence of commands reaches a fragmenting writer complete and in order.
        #[test]
        fn test_stream_survives_fragmentation(
            commands in prop::collection::vec(arbitrary_command(), 0..50),
            chunk in 1usize..40,
            batch in prop::sample::select(vec![0usize, 32, 100, 1400])
        ) {
            let mut encoder = CommandEncoder::new();
            let mut expected = Vec::new();
            let mut out = PxOutStream::with_batch(FragmentingWriter { data: Vec::new(), chunk }, batch);

            for cmd in &commands {
                let bytes = encoder.encode(cmd.position, cmd.color);
                expected.extend_from_slice(bytes);
                out.write_command(bytes).unwrap();
            }
            out.flush().unwrap();

            prop_assert_eq!(&out.get_ref().data, &expected);
            prop_assert_eq!(out.commands_written(), commands.len() as u64);
        }
    }
}
