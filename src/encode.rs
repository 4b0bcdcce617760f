use crate::value::Value;

/// Encodes `value` into its canonical bencode form.
///
/// Dictionary entries are written in ascending byte order of their keys,
/// whatever order they were inserted in.
pub fn encode(value: &Value) -> Vec<u8> {
    let mut buf = Vec::with_capacity(encoded_len(value));
    Encoder { out: &mut buf }.write_value(value);
    buf
}

/// Encodes `value` and writes it to `w`.
pub fn encode_to_writer<W>(value: &Value, mut w: W) -> ::std::io::Result<()>
where
    W: ::std::io::Write,
{
    w.write_all(&encode(value))
}

/// Number of bytes [`encode`] produces for `value`.
pub fn encoded_len(value: &Value) -> usize {
    match value {
        Value::Integer(i) => 2 + sizeof_integer(*i),
        Value::ByteString(b) => sizeof_bytes(b),
        Value::List(l) => 2 + l.iter().map(encoded_len).sum::<usize>(),
        Value::Dictionary(d) => {
            2 + d
                .iter()
                .map(|(k, v)| sizeof_bytes(k) + encoded_len(v))
                .sum::<usize>()
        }
    }
}

fn sizeof_decimal(mut v: u64) -> usize {
    let mut size = 1;
    while v >= 10 {
        size += 1;
        v /= 10;
    }
    size
}

fn sizeof_integer(v: i64) -> usize {
    sizeof_decimal(v.unsigned_abs()) + usize::from(v < 0)
}

fn sizeof_bytes(v: &[u8]) -> usize {
    sizeof_decimal(v.len() as u64) + 1 + v.len()
}

struct Encoder<'a> {
    out: &'a mut Vec<u8>,
}

impl<'a> Encoder<'a> {
    fn write_value(&mut self, value: &Value) {
        match value {
            Value::Integer(i) => self.write_integer(*i),
            Value::ByteString(b) => self.write_bytes(b),
            Value::List(l) => {
                self.out.push(b'l');
                for item in l {
                    self.write_value(item);
                }
                self.out.push(b'e');
            }
            Value::Dictionary(d) => {
                self.out.push(b'd');
                // BTreeMap<Vec<u8>, _> iterates in byte-lexicographic key order.
                for (k, v) in d {
                    self.write_bytes(k);
                    self.write_value(v);
                }
                self.out.push(b'e');
            }
        }
    }

    fn write_integer(&mut self, v: i64) {
        self.out.push(b'i');
        self.out.extend_from_slice(v.to_string().as_bytes());
        self.out.push(b'e');
    }

    fn write_bytes(&mut self, v: &[u8]) {
        self.out.extend_from_slice(v.len().to_string().as_bytes());
        self.out.push(b':');
        self.out.extend_from_slice(v);
    }
}
