use crate::StoreError;

pub fn put_varint(mut x: u64, out: &mut Vec<u8>) {
    while x >= 0x80 {
        out.push(((x as u8) & 0x7F) | 0x80);
        x >>= 7;
    }
    out.push(x as u8);
}

pub fn get_varint(bytes: &[u8]) -> Option<(u64, &[u8])> {
    let mut shift = 0u32;
    let mut val = 0u64;
    for (i, b) in bytes.iter().enumerate() {
        let byte = *b as u64;
        val |= (byte & 0x7F) << shift;
        if (byte & 0x80) == 0 {
            return Some((val, &bytes[i + 1..]));
        }
        shift += 7;
        if shift > 63 {
            return None;
        }
    }
    None
}

/// Строка с varint-длиной впереди
pub fn put_str(s: &str, out: &mut Vec<u8>) {
    put_varint(s.len() as u64, out);
    out.extend_from_slice(s.as_bytes());
}

/// Последовательное чтение тела файла; любая нехватка байт — `Corrupt`
pub struct Slice<'a> {
    buf: &'a [u8],
    file: &'static str,
}

impl<'a> Slice<'a> {
    pub fn new(buf: &'a [u8], file: &'static str) -> Self {
        Self { buf, file }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    fn corrupt(&self, reason: &str) -> StoreError {
        StoreError::corrupt(self.file, reason)
    }

    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8], StoreError> {
        if self.buf.len() < n {
            return Err(self.corrupt("unexpected end of data"));
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    pub fn u16_le(&mut self) -> Result<u16, StoreError> {
        let b = self.bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn u32_le(&mut self) -> Result<u32, StoreError> {
        let mut a = [0u8; 4];
        a.copy_from_slice(self.bytes(4)?);
        Ok(u32::from_le_bytes(a))
    }

    pub fn u64_le(&mut self) -> Result<u64, StoreError> {
        let mut a = [0u8; 8];
        a.copy_from_slice(self.bytes(8)?);
        Ok(u64::from_le_bytes(a))
    }

    pub fn varint(&mut self) -> Result<u64, StoreError> {
        let (v, rest) = get_varint(self.buf).ok_or_else(|| self.corrupt("bad varint"))?;
        self.buf = rest;
        Ok(v)
    }

    pub fn str(&mut self) -> Result<&'a str, StoreError> {
        let len = self.varint()? as usize;
        let raw = self.bytes(len)?;
        std::str::from_utf8(raw).map_err(|_| self.corrupt("invalid utf-8"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_boundaries() {
        for x in [0u64, 127, 128, 300, u32::MAX as u64, u64::MAX] {
            let mut buf = Vec::new();
            put_varint(x, &mut buf);
            let (v, rest) = get_varint(&buf).unwrap();
            assert_eq!(v, x);
            assert!(rest.is_empty());
        }
        assert!(get_varint(&[0x80, 0x80]).is_none());
    }

    #[test]
    fn slice_reports_truncation() {
        let mut buf = Vec::new();
        put_str("渋谷", &mut buf);
        let mut s = Slice::new(&buf[..buf.len() - 1], "t");
        assert!(matches!(s.str(), Err(StoreError::Corrupt { .. })));

        let mut s = Slice::new(&buf, "t");
        assert_eq!(s.str().unwrap(), "渋谷");
        assert_eq!(s.remaining(), 0);
    }
}
