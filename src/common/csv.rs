// src/common/csv.rs

// Escritor CSV mínimo (RFC 4180) que acumula em memória.
#[derive(Default)]
pub struct CsvWriter {
    buf: String,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self { buf: String::new() }
    }

    pub fn write_record<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                self.buf.push(',');
            }
            push_field(&mut self.buf, field.as_ref());
        }
        self.buf.push_str("\r\n");
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

fn push_field(buf: &mut String, field: &str) {
    if field.contains([',', '"', '\r', '\n']) {
        buf.push('"');
        buf.push_str(&field.replace('"', "\"\""));
        buf.push('"');
    } else {
        buf.push_str(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_only_when_needed() {
        let mut w = CsvWriter::new();
        w.write_record(["cnpj", "nome"]);
        w.write_record(["1", "AVENIDA X, 237"]);
        w.write_record(["2", "LOJA \"BOA\""]);

        assert_eq!(
            w.finish(),
            "cnpj,nome\r\n1,\"AVENIDA X, 237\"\r\n2,\"LOJA \"\"BOA\"\"\"\r\n"
        );
    }
}
